//! Browser entry point for the family tree viewer.

// Dependencies are used by the library target.
#![allow(unused_crate_dependencies)]

use family_tree_canvas::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App)
}
