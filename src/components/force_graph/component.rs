use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::filter::FilteredGraph;
use super::render;
use super::state::ForceGraphState;

const DEFAULT_WIDTH: f64 = 760.0;
const FRAME_DT: f64 = 0.016;

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn fitted_width(canvas: &HtmlCanvasElement) -> f64 {
	canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(DEFAULT_WIDTH)
}

fn request_frame(cb: &Closure<dyn FnMut()>) {
	if let Some(window) = web_sys::window() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

/// Physics-driven flow graph on a 2D canvas.
///
/// A single animation loop drives the one simulation owned by the canvas
/// state; a new `graph` value replaces that simulation.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] graph: Signal<FilteredGraph>,
	/// Zoom factor mirrored from the graph view.
	#[prop(into)]
	scale: Signal<f64>,
	/// Changes whenever the view is reset; restores the identity transform.
	#[prop(into)]
	reset_epoch: Signal<u64>,
	on_node_click: Callback<String>,
	/// Reports wheel zoom so the view state can follow it.
	on_zoom: Callback<f64>,
	#[prop(default = 420.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = Rc::new(RefCell::new(ForceGraphState::new(DEFAULT_WIDTH, height)));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init) = (state.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if animate_init.borrow().is_some() {
			return;
		}
		if web_sys::window().is_none() {
			warn!("no window; flow graph canvas disabled");
			return;
		}

		let w = fitted_width(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(height as u32);
		state_init.borrow_mut().resize(w, height);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("2d context has an unexpected type");
					return;
				}
			},
			_ => {
				warn!("canvas 2d context unavailable");
				return;
			}
		};

		let (state_anim, animate_inner, canvas_anim) =
			(state_init.clone(), animate_init.clone(), canvas.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !canvas_anim.is_connected() {
				debug!("flow graph canvas detached; stopping layout");
				state_anim.borrow_mut().slot.stop();
				return;
			}
			{
				let mut s = state_anim.borrow_mut();
				s.tick(FRAME_DT);
				render::render(&s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				request_frame(cb);
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			request_frame(cb);
		}
	});

	// Scoped to the component so unmounting detaches it.
	let state_resize = state.clone();
	let resize = window_event_listener(leptos::ev::resize, move |_| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let w = fitted_width(&canvas);
		canvas.set_width(w as u32);
		state_resize.borrow_mut().resize(w, height);
	});
	on_cleanup(move || resize.remove());

	let state_load = state.clone();
	Effect::new(move |_| {
		let g = graph.get();
		let mut s = state_load.borrow_mut();
		s.load(&g);
		if let Some(sim) = s.simulation() {
			info!(
				"layout #{} started: {} nodes, {} links",
				s.slot.generation(),
				sim.nodes().len(),
				sim.links().len()
			);
		}
	});

	let state_zoom = state.clone();
	Effect::new(move |_| {
		let k = scale.get();
		state_zoom.borrow_mut().set_zoom(k);
	});

	let state_reset = state.clone();
	Effect::new(move |prev: Option<u64>| {
		let epoch = reset_epoch.get();
		if prev.is_some_and(|p| p != epoch) {
			state_reset.borrow_mut().reset_view();
		}
		epoch
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		state_md.borrow_mut().pointer_down(x, y);
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		state_mm.borrow_mut().pointer_move(x, y);
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = state_mu.borrow_mut().pointer_up();
		if let Some(id) = clicked {
			debug!("graph node clicked: {id}");
			on_node_click.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		state_ml.borrow_mut().pointer_leave();
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		let k = state_wh.borrow_mut().zoom_at(x, y, factor);
		on_zoom.run(k);
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
