mod component;
pub mod config;
pub mod graph;
pub mod layout;
mod render;
pub mod routing;
pub mod state;
mod types;
pub mod viewport;

pub use component::FamilyTreeCanvas;
pub use types::{Gender, GraphSnapshot, PersonId, PersonRecord, RelationshipEdge};
