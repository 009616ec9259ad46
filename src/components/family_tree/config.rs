//! Layout constants and responsive breakpoint tiers.

/// Canvas widths below this use the compact tier.
pub const COMPACT_BREAKPOINT: f64 = 768.0;
/// Canvas widths below this (and at least [`COMPACT_BREAKPOINT`]) use the medium tier.
pub const WIDE_BREAKPOINT: f64 = 1024.0;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 3.0;
/// Upper bound for the fit-to-content scale.
pub const FIT_SCALE_CAP: f64 = 0.8;
pub const FOCUS_SCALE: f64 = 1.0;
/// Seconds.
pub const FOCUS_DURATION: f64 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Density {
	Compact,
	Medium,
	Wide,
}

impl Density {
	pub fn for_width(canvas_width: f64) -> Self {
		if canvas_width < COMPACT_BREAKPOINT {
			Density::Compact
		} else if canvas_width < WIDE_BREAKPOINT {
			Density::Medium
		} else {
			Density::Wide
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub density: Density,
	pub node_width: f64,
	pub node_height: f64,
	pub min_node_spacing: f64,
	pub level_height: f64,
	pub font_size: f64,
	pub corner_radius: f64,
	pub max_label_chars: usize,
	/// Extra width of the isolated column beyond one node.
	pub isolated_column_extra: f64,
	pub isolated_gap: f64,
	pub top_margin: f64,
	/// Space between the isolated column and the first tree.
	pub tree_gutter: f64,
	/// Margin kept free on every canvas edge when fitting.
	pub canvas_margin: f64,
	/// Added to the content extent (besides one node) when fitting.
	pub fit_padding: f64,
	/// Gap between the end of a link and the child's top edge.
	pub link_standoff: f64,
	pub arrow_size: f64,
}

impl LayoutConfig {
	/// Configuration for a canvas of the given width.
	pub fn for_canvas_width(canvas_width: f64) -> Self {
		let density = Density::for_width(canvas_width);
		let (node_height, min_node_spacing, level_height, font_size) = match density {
			Density::Compact => (40.0, 15.0, 90.0, 10.0),
			Density::Medium => (40.0, 20.0, 120.0, 12.0),
			Density::Wide => (50.0, 20.0, 120.0, 12.0),
		};
		Self {
			density,
			node_width: 120.0,
			node_height,
			min_node_spacing,
			level_height,
			font_size,
			corner_radius: 8.0,
			max_label_chars: 15,
			isolated_column_extra: 40.0,
			isolated_gap: 15.0,
			top_margin: 60.0,
			tree_gutter: 50.0,
			canvas_margin: 40.0,
			fit_padding: 100.0,
			link_standoff: 10.0,
			arrow_size: 8.0,
		}
	}

	/// Horizontal footprint of a leaf.
	pub fn leaf_width(&self) -> f64 {
		self.node_width + self.min_node_spacing
	}

	pub fn isolated_column_width(&self) -> f64 {
		self.node_width + self.isolated_column_extra
	}

	/// Node label, cut with an ellipsis past `max_label_chars`.
	pub fn truncate_label(&self, name: &str) -> String {
		if name.chars().count() <= self.max_label_chars {
			return name.to_string();
		}
		let kept: String = name
			.chars()
			.take(self.max_label_chars.saturating_sub(3))
			.collect();
		format!("{kept}...")
	}
}
