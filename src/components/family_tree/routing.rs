//! Orthogonal parent-to-child connectors.

use super::config::LayoutConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Down from the parent, across at the midline, down into the child.
#[derive(Clone, Debug, PartialEq)]
pub struct ElbowPath {
	pub points: [Point; 4],
}

impl ElbowPath {
	/// Route between two node centers.
	pub fn route(parent: Point, child: Point, config: &LayoutConfig) -> Self {
		let start = Point::new(parent.x, parent.y + config.node_height / 2.0);
		let end = Point::new(
			child.x,
			child.y - config.node_height / 2.0 - config.link_standoff,
		);
		let mid_y = start.y + (end.y - start.y) / 2.0;
		Self {
			points: [
				start,
				Point::new(start.x, mid_y),
				Point::new(end.x, mid_y),
				end,
			],
		}
	}

	pub fn end(&self) -> Point {
		self.points[3]
	}

	/// Arrowhead triangle with its tip on the path end, pointing along the last segment.
	pub fn arrowhead(&self, size: f64) -> [Point; 3] {
		let tip = self.end();
		let from = self.points[2];
		let (dx, dy) = (tip.x - from.x, tip.y - from.y);
		let len = (dx * dx + dy * dy).sqrt();
		// Degenerate last segment: point straight down.
		let (ux, uy) = if len < 1e-6 { (0.0, 1.0) } else { (dx / len, dy / len) };
		let (back_x, back_y) = (tip.x - ux * size, tip.y - uy * size);
		let (px, py) = (-uy * size * 0.5, ux * size * 0.5);
		[
			tip,
			Point::new(back_x + px, back_y + py),
			Point::new(back_x - px, back_y - py),
		]
	}
}
