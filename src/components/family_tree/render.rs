use web_sys::CanvasRenderingContext2d;

use super::layout::PositionedNode;
use super::state::FamilyTreeState;

const BACKGROUND: &str = "#ffffff";
const LINK_COLOR: &str = "rgba(102, 102, 102, 0.8)";
const NODE_STROKE: &str = "#ffffff";
const FOCUS_STROKE: &str = "#ff6b6b";
const LABEL_COLOR: &str = "#111827";

pub fn render(state: &FamilyTreeState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width(), state.height());
	if state.layout.is_empty() {
		return;
	}
	let transform = state.viewport.transform();
	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(state: &FamilyTreeState, ctx: &CanvasRenderingContext2d) {
	let config = &state.layout.config;
	ctx.set_stroke_style_str(LINK_COLOR);
	ctx.set_fill_style_str(LINK_COLOR);
	ctx.set_line_width(2.0);
	ctx.set_line_join("round");

	for link in &state.layout.links {
		let [a, b, c, d] = link.path.points;
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.line_to(c.x, c.y);
		ctx.line_to(d.x, d.y);
		ctx.stroke();

		let [tip, left, right] = link.path.arrowhead(config.arrow_size);
		ctx.begin_path();
		ctx.move_to(tip.x, tip.y);
		ctx.line_to(left.x, left.y);
		ctx.line_to(right.x, right.y);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_nodes(state: &FamilyTreeState, ctx: &CanvasRenderingContext2d) {
	let config = &state.layout.config;
	ctx.set_font(&format!("bold {}px sans-serif", config.font_size));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for (slot, node) in state.layout.nodes.iter().enumerate() {
		rounded_rect(ctx, node, config.node_width, config.node_height, config.corner_radius);
		ctx.set_fill_style_str(state.color_of(slot));
		ctx.fill();

		let (stroke, width) = node_stroke(state, slot);
		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(width);
		ctx.stroke();

		ctx.set_fill_style_str(LABEL_COLOR);
		let _ = ctx.fill_text(&config.truncate_label(&node.id), node.x, node.y);
	}
}

/// Outline color and width. Hover only changes the cursor.
fn node_stroke(state: &FamilyTreeState, slot: usize) -> (&'static str, f64) {
	if state.is_focused(slot) {
		(FOCUS_STROKE, 4.0)
	} else {
		(NODE_STROKE, 2.0)
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, node: &PositionedNode, w: f64, h: f64, r: f64) {
	let (left, top) = (node.x - w / 2.0, node.y - h / 2.0);
	let (right, bottom) = (left + w, top + h);
	ctx.begin_path();
	ctx.move_to(left + r, top);
	let _ = ctx.arc_to(right, top, right, bottom, r);
	let _ = ctx.arc_to(right, bottom, left, bottom, r);
	let _ = ctx.arc_to(left, bottom, left, top, r);
	let _ = ctx.arc_to(left, top, right, top, r);
	ctx.close_path();
}
