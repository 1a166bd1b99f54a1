use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::edge_style;
use super::state::{CENTER_RADIUS, ForceGraphState, NODE_RADIUS};
use crate::format::short_addr;

const BACKGROUND: &str = "#0b1220";
const NODE_COLOR: &str = "#3b82f6";
const CENTER_COLOR: &str = "#f59e0b";
const PLACEHOLDER: &str = "No graph data yet. Load an address with neighbors.";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	if state.simulation().is_none() {
		ctx.set_fill_style_str("rgba(203, 213, 225, 0.8)");
		ctx.set_font("14px sans-serif");
		let _ = ctx.fill_text(PLACEHOLDER, 20.0, 32.0);
		return;
	}
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn node_radius(state: &ForceGraphState, idx: usize) -> f64 {
	let is_center = state.simulation().and_then(|s| s.center_index()) == Some(idx);
	if is_center { CENTER_RADIUS } else { NODE_RADIUS }
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(sim) = state.simulation() else {
		return;
	};
	let k = state.transform.k;
	let (dash, gap, arrow_size) = (8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	for link in sim.links() {
		let (Some(p1), Some(p2)) = (sim.position(link.source), sim.position(link.target)) else {
			continue;
		};
		let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let weight = edge_style(link.tx_count, state.max_tx);
		let base_width = weight.width / k;
		let is_highlighted =
			state.is_highlighted(link.source) && state.is_highlighted(link.target);

		// Weight sets the resting look; hover brightens linked edges and dims the rest
		let (edge_alpha, width) = if is_highlighted {
			(
				weight.opacity + (1.0 - weight.opacity) * t,
				base_width * (1.0 + 0.3 * t),
			)
		} else {
			(weight.opacity * (1.0 - 0.75 * t), base_width * (1.0 - 0.3 * t))
		};

		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", edge_alpha));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (r1, r2) = (node_radius(state, link.source), node_radius(state, link.target));
		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(p1.x + ux * r1, p1.y + uy * r1);
		ctx.line_to(
			p2.x - ux * (r2 + arrow_size),
			p2.y - uy * (r2 + arrow_size),
		);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&format!(
			"rgba(100, 180, 255, {})",
			(edge_alpha + 0.1).min(1.0)
		));
		let (tip_x, tip_y) = (p2.x - ux * r2, p2.y - uy * r2);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(sim) = state.simulation() else {
		return;
	};
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);
	let center = sim.center_index();
	let font = format!("{}px sans-serif", 10.0 / k.max(0.5));

	for (idx, node) in sim.nodes().iter().enumerate() {
		let highlighted = has_highlight && state.is_highlighted(idx);
		let is_hovered = highlighted && state.is_hovered(idx);
		let base = node_radius(state, idx);
		let (alpha, radius) = if !has_highlight {
			(1.0, base)
		} else if is_hovered {
			(1.0, base * (1.0 + 0.35 * t))
		} else if highlighted {
			(1.0, base * (1.0 + 0.2 * t))
		} else {
			(1.0 - 0.7 * t, base * (1.0 - 0.15 * t))
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(if Some(idx) == center {
			CENTER_COLOR
		} else {
			NODE_COLOR
		});
		ctx.fill();
		ctx.set_global_alpha(1.0);

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.85));
		ctx.set_font(&font);
		let _ = ctx.fill_text(&short_addr(&node.id), node.x + radius + 3.0, node.y + 3.0);
	}
}
