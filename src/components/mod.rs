//! Reusable view components.

pub mod family_tree;
