//! Screen transform: fit-to-content, animated focus, and live pan/zoom.

use super::config::{FIT_SCALE_CAP, FOCUS_SCALE, LayoutConfig, MAX_ZOOM, MIN_ZOOM};
use super::layout::Bounds;
use super::routing::Point;

/// `screen = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	#[cfg(test)]
	pub fn apply(&self, p: Point) -> Point {
		Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	pub fn invert(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	fn lerp(&self, to: &ViewTransform, t: f64) -> ViewTransform {
		ViewTransform {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

/// Largest scale up to the cap that shows every node, centred on the canvas.
pub fn fit_transform(
	bounds: Bounds,
	config: &LayoutConfig,
	width: f64,
	height: f64,
) -> ViewTransform {
	let dx = bounds.width() + config.node_width + config.fit_padding;
	let dy = bounds.height() + config.node_height + config.fit_padding;
	let available_w = width - 2.0 * config.canvas_margin;
	let available_h = height - 2.0 * config.canvas_margin;

	let scale = (available_w / dx).min(available_h / dy).min(FIT_SCALE_CAP);
	// Zero-size canvas or zero-extent content.
	let k = if scale.is_finite() && scale > 0.0 {
		scale
	} else {
		FIT_SCALE_CAP
	};

	let center = bounds.center();
	ViewTransform {
		x: width / 2.0 - center.x * k,
		y: height / 2.0 - center.y * k,
		k,
	}
}

/// Centre `target` on the canvas at unit scale.
pub fn focus_transform(target: Point, width: f64, height: f64) -> ViewTransform {
	ViewTransform {
		x: width / 2.0 - target.x * FOCUS_SCALE,
		y: height / 2.0 - target.y * FOCUS_SCALE,
		k: FOCUS_SCALE,
	}
}

fn ease_cubic_in_out(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
	duration: f64,
}

impl Tween {
	pub fn new(from: ViewTransform, to: ViewTransform, duration: f64) -> Self {
		Self {
			from,
			to,
			elapsed: 0.0,
			duration,
		}
	}

	pub fn is_finished(&self) -> bool {
		self.elapsed >= self.duration
	}

	/// Advance by `dt` seconds and return the interpolated transform.
	pub fn advance(&mut self, dt: f64) -> ViewTransform {
		self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
		if self.is_finished() {
			return self.to;
		}
		let t = ease_cubic_in_out(self.elapsed / self.duration);
		self.from.lerp(&self.to, t)
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PinchState {
	pub active: bool,
	pub start_distance: f64,
	pub start_k: f64,
}

/// Owner of the single live transform. Any write cancels a running tween.
#[derive(Clone, Debug)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	transform: ViewTransform,
	tween: Option<Tween>,
	pub pan: PanState,
	pub pinch: PinchState,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			tween: None,
			pan: PanState::default(),
			pinch: PinchState::default(),
		}
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	#[cfg(test)]
	pub fn is_animating(&self) -> bool {
		self.tween.is_some()
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn set_transform(&mut self, transform: ViewTransform) {
		self.tween = None;
		self.transform = transform;
	}

	/// Replace any running tween with one from the current transform to `to`.
	pub fn animate_to(&mut self, to: ViewTransform, duration: f64) {
		self.tween = Some(Tween::new(self.transform, to, duration));
	}

	pub fn tick(&mut self, dt: f64) {
		let Some(tween) = self.tween.as_mut() else {
			return;
		};
		self.transform = tween.advance(dt);
		if tween.is_finished() {
			self.tween = None;
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		self.transform.invert(sx, sy)
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.tween = None;
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn drag_pan(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		self.tween = None;
		self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
		self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Zoom by `factor` keeping the graph point under (sx, sy) fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.zoom_to(sx, sy, self.transform.k * factor);
	}

	fn zoom_to(&mut self, sx: f64, sy: f64, k: f64) {
		self.tween = None;
		let new_k = k.clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn begin_pinch(&mut self, distance: f64) {
		self.tween = None;
		self.pan.active = false;
		self.pinch = PinchState {
			active: true,
			start_distance: distance.max(1.0),
			start_k: self.transform.k,
		};
	}

	pub fn drag_pinch(&mut self, mid_x: f64, mid_y: f64, distance: f64) {
		if !self.pinch.active {
			return;
		}
		let k = self.pinch.start_k * distance / self.pinch.start_distance;
		self.zoom_to(mid_x, mid_y, k);
	}

	pub fn end_pinch(&mut self) {
		self.pinch.active = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;

	fn close(a: ViewTransform, b: ViewTransform) -> bool {
		(a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9 && (a.k - b.k).abs() < 1e-9
	}

	#[test]
	fn fit_is_capped() {
		let config = LayoutConfig::for_canvas_width(1200.0);
		let bounds = Bounds {
			min_x: 0.0,
			max_x: 0.0,
			min_y: 60.0,
			max_y: 60.0,
		};
		let t = fit_transform(bounds, &config, 1200.0, 800.0);
		assert_eq!(t.k, FIT_SCALE_CAP);
		assert_eq!(t.apply(Point::new(0.0, 60.0)), Point::new(600.0, 400.0));
	}

	#[test]
	fn fit_on_zero_sized_canvas_falls_back() {
		let config = LayoutConfig::for_canvas_width(0.0);
		let bounds = Bounds {
			min_x: -100.0,
			max_x: 100.0,
			min_y: 0.0,
			max_y: 300.0,
		};
		let t = fit_transform(bounds, &config, 0.0, 0.0);
		assert_eq!(t.k, FIT_SCALE_CAP);
		assert!(t.x.is_finite() && t.y.is_finite());
	}

	#[test]
	fn focus_centres_node_at_unit_scale() {
		let t = focus_transform(Point::new(-280.0, 180.0), 1000.0, 600.0);
		assert_eq!(t.k, 1.0);
		assert_eq!(t.apply(Point::new(-280.0, 180.0)), Point::new(500.0, 300.0));
	}

	#[test]
	fn tween_reaches_target_within_duration() {
		let from = ViewTransform::default();
		let to = ViewTransform {
			x: 100.0,
			y: -50.0,
			k: 2.0,
		};
		let mut tween = Tween::new(from, to, 0.75);
		let halfway = tween.advance(0.375);
		assert!(close(halfway, from.lerp(&to, 0.5)));
		assert!(!tween.is_finished());
		let end = tween.advance(0.5);
		assert!(tween.is_finished());
		assert_eq!(end, to);
	}

	#[test]
	fn pan_cancels_tween() {
		let mut viewport = Viewport::new(800.0, 600.0);
		viewport.set_transform(ViewTransform::default());
		viewport.animate_to(
			ViewTransform {
				x: 300.0,
				y: 300.0,
				k: 1.0,
			},
			0.75,
		);
		viewport.tick(0.1);
		assert!(viewport.is_animating());
		let before = viewport.transform();

		viewport.begin_pan(10.0, 10.0);
		viewport.drag_pan(30.0, 15.0);
		assert!(!viewport.is_animating());
		assert_eq!(viewport.transform().x, before.x + 20.0);
		assert_eq!(viewport.transform().y, before.y + 5.0);

		viewport.tick(1.0);
		assert_eq!(viewport.transform().x, before.x + 20.0);
	}

	#[test]
	fn wheel_zoom_keeps_pointer_fixed_and_clamps() {
		let mut viewport = Viewport::new(800.0, 600.0);
		let anchor = viewport.screen_to_graph(200.0, 100.0);
		viewport.zoom_at(200.0, 100.0, 1.1);
		let moved = viewport.transform().apply(anchor);
		assert!((moved.x - 200.0).abs() < 1e-9 && (moved.y - 100.0).abs() < 1e-9);

		for _ in 0..100 {
			viewport.zoom_at(0.0, 0.0, 1.1);
		}
		assert_eq!(viewport.transform().k, MAX_ZOOM);
		for _ in 0..200 {
			viewport.zoom_at(0.0, 0.0, 0.9);
		}
		assert_eq!(viewport.transform().k, MIN_ZOOM);
	}

	#[test]
	fn pinch_scales_from_start_distance() {
		let mut viewport = Viewport::new(800.0, 600.0);
		viewport.begin_pinch(100.0);
		viewport.drag_pinch(400.0, 300.0, 200.0);
		assert!((viewport.transform().k - 2.0).abs() < 1e-9);
		viewport.end_pinch();
		viewport.drag_pinch(400.0, 300.0, 50.0);
		assert!((viewport.transform().k - 2.0).abs() < 1e-9);
	}

	proptest! {
		#[test]
		fn fitted_content_stays_on_canvas(
			xs in prop::collection::vec(-3000.0f64..3000.0, 1..40),
			ys in prop::collection::vec(0.0f64..2000.0, 1..40),
			width in 200.0f64..2400.0,
			height in 200.0f64..1600.0,
		) {
			let config = LayoutConfig::for_canvas_width(width);
			let fold = |v: &[f64]| {
				v.iter()
					.fold((f64::MAX, f64::MIN), |(lo, hi), &x| (lo.min(x), hi.max(x)))
			};
			let ((min_x, max_x), (min_y, max_y)) = (fold(xs.as_slice()), fold(ys.as_slice()));
			let bounds = Bounds { min_x, max_x, min_y, max_y };
			let t = fit_transform(bounds, &config, width, height);

			let pad_x = (config.node_width + config.fit_padding) / 2.0;
			let pad_y = (config.node_height + config.fit_padding) / 2.0;
			let top_left = t.apply(Point::new(min_x - pad_x, min_y - pad_y));
			let bottom_right = t.apply(Point::new(max_x + pad_x, max_y + pad_y));
			let eps = 1e-6;
			prop_assert!(t.k > 0.0 && t.k <= FIT_SCALE_CAP);
			prop_assert!(top_left.x >= -eps && top_left.y >= -eps);
			prop_assert!(bottom_right.x <= width + eps && bottom_right.y <= height + eps);
		}
	}
}
