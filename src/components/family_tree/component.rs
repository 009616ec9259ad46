use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent, Window,
};

use super::render;
use super::state::FamilyTreeState;
use super::types::{GraphSnapshot, PersonId};

type SharedState = Rc<RefCell<Option<FamilyTreeState>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Longest frame step fed to the focus animation, in seconds.
const MAX_FRAME_STEP: f64 = 0.1;

/// Canvas drawing the family tree of `data`.
///
/// The layout is recomputed whenever `data`, `focused` or the canvas size
/// changes. `color_for` supplies each person's fill and `on_node_activated`
/// receives the id of a clicked or tapped person.
#[component]
pub fn FamilyTreeCanvas(
	#[prop(into)] data: Signal<GraphSnapshot>,
	#[prop(into)] focused: Signal<Option<PersonId>>,
	#[prop(into)] color_for: Callback<PersonId, String>,
	#[prop(into)] on_node_activated: Callback<PersonId>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let sizing = Sizing {
		fullscreen,
		width,
		height,
	};

	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |mounted: Option<bool>| {
		let snapshot = data.get();
		let focus = focused.get();
		let colors: HashMap<PersonId, String> = snapshot
			.nodes
			.iter()
			.map(|p| (p.id.clone(), color_for.run(p.id.clone())))
			.collect();

		let Some(canvas) = canvas_ref.get() else {
			return false;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if mounted != Some(true)
			&& !mount(&canvas, sizing, &state_init, &animate_init, &resize_cb_init)
		{
			return false;
		}

		if let Some(ref mut s) = *state_init.borrow_mut() {
			s.sync(snapshot, focus, colors);
		}
		true
	});

	let to_local = move |client_x: f64, client_y: f64| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((client_x - rect.left(), client_y - rect.top()))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = to_local(ev.client_x() as f64, ev.client_y() as f64) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press(x, y);
		}
		set_cursor(canvas_ref.get(), "grabbing");
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = to_local(ev.client_x() as f64, ev.client_y() as f64) else {
			return;
		};
		let cursor = match *state_mm.borrow_mut() {
			Some(ref mut s) => {
				s.pointer_move(x, y);
				s.cursor()
			}
			None => return,
		};
		set_cursor(canvas_ref.get(), cursor);
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let activated = state_mu.borrow_mut().as_mut().and_then(|s| s.release());
		set_cursor(canvas_ref.get(), "grab");
		if let Some(id) = activated {
			info!("activated {:?}", id);
			on_node_activated.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = to_local(ev.client_x() as f64, ev.client_y() as f64) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.viewport.zoom_at(x, y, factor);
		}
	};

	let touches = move |ev: &TouchEvent| -> Vec<(f64, f64)> {
		let list = ev.touches();
		(0..list.length())
			.filter_map(|i| list.get(i))
			.filter_map(|t| to_local(t.client_x() as f64, t.client_y() as f64))
			.collect()
	};

	let state_ts = state.clone();
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		let points = touches(&ev);
		if let Some(ref mut s) = *state_ts.borrow_mut() {
			s.touch_start(&points);
		}
	};

	let state_tm = state.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let points = touches(&ev);
		if let Some(ref mut s) = *state_tm.borrow_mut() {
			s.touch_move(&points);
		}
	};

	let state_te = state.clone();
	let on_touchend = move |ev: TouchEvent| {
		ev.prevent_default();
		let remaining = ev.touches().length() as usize;
		let activated = state_te
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.touch_end(remaining));
		if let Some(id) = activated {
			info!("activated {:?}", id);
			on_node_activated.run(id);
		}
	};

	let state_tc = state.clone();
	let on_touchcancel = move |_: TouchEvent| {
		if let Some(ref mut s) = *state_tc.borrow_mut() {
			s.leave();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="family-tree-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:touchcancel=on_touchcancel
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}

#[derive(Clone, Copy)]
struct Sizing {
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
}

impl Sizing {
	fn measure(&self, canvas: &HtmlCanvasElement) -> (f64, f64) {
		if self.fullscreen {
			if let Some(window) = web_sys::window() {
				return (
					window_dimension(window.inner_width(), 800.0),
					window_dimension(window.inner_height(), 600.0),
				);
			}
		}
		let parent = canvas.parent_element();
		(
			self.width.unwrap_or_else(|| {
				parent
					.as_ref()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			self.height.unwrap_or_else(|| {
				parent
					.as_ref()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		)
	}
}

fn window_dimension(value: Result<JsValue, JsValue>, fallback: f64) -> f64 {
	value.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
}

fn set_cursor(canvas: Option<HtmlCanvasElement>, cursor: &str) {
	if let Some(canvas) = canvas {
		let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
	}
}

/// Size the canvas, create the state, and start the resize listener and frame loop.
fn mount(
	canvas: &HtmlCanvasElement,
	sizing: Sizing,
	state: &SharedState,
	animate: &FrameCallback,
	resize_cb: &FrameCallback,
) -> bool {
	let Some(window) = web_sys::window() else {
		warn!("no window, family tree canvas not started");
		return false;
	};
	let Some(ctx) = canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
	else {
		warn!("2d context unavailable, family tree canvas not started");
		return false;
	};

	let (w, h) = sizing.measure(canvas);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	*state.borrow_mut() = Some(FamilyTreeState::new(w, h));

	let (state_resize, canvas_resize) = (state.clone(), canvas.clone());
	*resize_cb.borrow_mut() = Some(Closure::new(move || {
		let (nw, nh) = sizing.measure(&canvas_resize);
		canvas_resize.set_width(nw as u32);
		canvas_resize.set_height(nh as u32);
		if let Some(ref mut s) = *state_resize.borrow_mut() {
			s.resize(nw, nh);
		}
	}));
	if let Some(ref cb) = *resize_cb.borrow() {
		let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}

	let (state_anim, animate_inner) = (state.clone(), animate.clone());
	let last_frame = Rc::new(Cell::new(js_sys::Date::now()));
	*animate.borrow_mut() = Some(Closure::new(move || {
		let now = js_sys::Date::now();
		let dt = ((now - last_frame.get()) / 1000.0).clamp(0.0, MAX_FRAME_STEP);
		last_frame.set(now);
		if let Some(ref mut s) = *state_anim.borrow_mut() {
			s.tick(dt);
			render::render(s, &ctx);
		}
		if let Some(ref cb) = *animate_inner.borrow() {
			request_frame(cb);
		}
	}));
	if let Some(ref cb) = *animate.borrow() {
		request_frame(cb);
	}
	info!("family tree canvas mounted at {}x{}", w, h);
	true
}

fn request_frame(cb: &Closure<dyn FnMut()>) {
	let window: Option<Window> = web_sys::window();
	if let Some(window) = window {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}
