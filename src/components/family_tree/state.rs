use std::collections::HashMap;

use log::debug;

use super::config::{FOCUS_DURATION, LayoutConfig};
use super::graph::FamilyGraph;
use super::layout::{TreeLayout, layout_family};
use super::types::{GraphSnapshot, PersonId};
use super::viewport::{Viewport, fit_transform, focus_transform};

/// Pointer travel (screen px) below which a press-release counts as a click.
pub const CLICK_TOLERANCE: f64 = 4.0;
pub const FALLBACK_COLOR: &str = "#F3F4F6";

#[derive(Clone, Debug, Default)]
pub struct PressState {
	pub slot: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub moved: bool,
}

/// Everything the canvas needs between frames.
pub struct FamilyTreeState {
	pub data: GraphSnapshot,
	pub layout: TreeLayout,
	pub viewport: Viewport,
	pub colors: HashMap<PersonId, String>,
	pub focused: Option<PersonId>,
	pub hovered: Option<usize>,
	pub press: Option<PressState>,
}

impl FamilyTreeState {
	pub fn new(width: f64, height: f64) -> Self {
		let config = LayoutConfig::for_canvas_width(width);
		Self {
			data: GraphSnapshot::default(),
			layout: TreeLayout {
				config,
				nodes: Vec::new(),
				links: Vec::new(),
			},
			viewport: Viewport::new(width, height),
			colors: HashMap::new(),
			focused: None,
			hovered: None,
			press: None,
		}
	}

	pub fn width(&self) -> f64 {
		self.viewport.width
	}

	pub fn height(&self) -> f64 {
		self.viewport.height
	}

	/// New data, focus, or colors from the host. Reruns the whole pipeline.
	pub fn sync(
		&mut self,
		data: GraphSnapshot,
		focused: Option<PersonId>,
		colors: HashMap<PersonId, String>,
	) {
		self.data = data;
		self.focused = focused;
		self.colors = colors;
		self.recompute();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport.resize(width, height);
		self.recompute();
	}

	fn recompute(&mut self) {
		let (width, height) = (self.width(), self.height());
		let config = LayoutConfig::for_canvas_width(width);
		let graph = FamilyGraph::build(&self.data);
		self.layout = layout_family(&graph, &config, width);
		self.hovered = None;
		self.press = None;

		if let Some(bounds) = self.layout.bounds() {
			self.viewport
				.set_transform(fit_transform(bounds, &config, width, height));
		}
		let target = self
			.focused
			.as_deref()
			.and_then(|id| self.layout.find(id))
			.map(|node| node.center());
		if let Some(target) = target {
			self.viewport
				.animate_to(focus_transform(target, width, height), FOCUS_DURATION);
		}
		debug!(
			"recomputed {}x{} canvas, {:?} density, focus {:?}",
			width, height, config.density, self.focused
		);
	}

	pub fn tick(&mut self, dt: f64) {
		self.viewport.tick(dt);
	}

	/// Topmost node slot under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let p = self.viewport.screen_to_graph(sx, sy);
		let (half_w, half_h) = (
			self.layout.config.node_width / 2.0,
			self.layout.config.node_height / 2.0,
		);
		self.layout
			.nodes
			.iter()
			.rposition(|n| (p.x - n.x).abs() <= half_w && (p.y - n.y).abs() <= half_h)
	}

	pub fn color_of(&self, slot: usize) -> &str {
		self.colors
			.get(&self.layout.nodes[slot].id)
			.map(String::as_str)
			.unwrap_or(FALLBACK_COLOR)
	}

	pub fn is_focused(&self, slot: usize) -> bool {
		self.focused.as_deref() == Some(self.layout.nodes[slot].id.as_str())
	}

	pub fn press(&mut self, sx: f64, sy: f64) {
		self.press = Some(PressState {
			slot: self.node_at_position(sx, sy),
			start_x: sx,
			start_y: sy,
			moved: false,
		});
		self.viewport.begin_pan(sx, sy);
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		match self.press.as_mut() {
			Some(press) => {
				let (dx, dy) = (sx - press.start_x, sy - press.start_y);
				if (dx * dx + dy * dy).sqrt() > CLICK_TOLERANCE {
					press.moved = true;
				}
				self.viewport.drag_pan(sx, sy);
			}
			None => self.hovered = self.node_at_position(sx, sy),
		}
	}

	/// CSS cursor for the current pointer state.
	pub fn cursor(&self) -> &'static str {
		if self.press.is_some() {
			"grabbing"
		} else if self.hovered.is_some() {
			"pointer"
		} else {
			"grab"
		}
	}

	/// End of a press. Returns the activated person if it was a click on a node.
	pub fn release(&mut self) -> Option<PersonId> {
		self.viewport.end_pan();
		let press = self.press.take()?;
		if press.moved {
			return None;
		}
		press.slot.map(|slot| self.layout.nodes[slot].id.clone())
	}

	pub fn leave(&mut self) {
		self.viewport.end_pan();
		self.viewport.end_pinch();
		self.press = None;
		self.hovered = None;
	}

	pub fn touch_start(&mut self, touches: &[(f64, f64)]) {
		match touches {
			[(x, y)] => self.press(*x, *y),
			[a, b, ..] => {
				self.press = None;
				self.viewport.begin_pinch(distance(*a, *b));
			}
			[] => {}
		}
	}

	pub fn touch_move(&mut self, touches: &[(f64, f64)]) {
		match touches {
			[(x, y)] if !self.viewport.pinch.active => self.pointer_move(*x, *y),
			[a, b, ..] => {
				let (mid_x, mid_y) = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
				self.viewport.drag_pinch(mid_x, mid_y, distance(*a, *b));
			}
			_ => {}
		}
	}

	/// `remaining` are the touches still down.
	pub fn touch_end(&mut self, remaining: usize) -> Option<PersonId> {
		if self.viewport.pinch.active {
			if remaining < 2 {
				self.viewport.end_pinch();
			}
			return None;
		}
		if remaining == 0 {
			return self.release();
		}
		None
	}
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
	((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}
