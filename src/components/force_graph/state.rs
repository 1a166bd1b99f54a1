use std::collections::HashSet;

use super::filter::FilteredGraph;
use super::scale::{MAX_ZOOM, MIN_ZOOM, clamp_zoom};
use super::simulation::{LayoutSlot, Simulation, SimulationParams};
use super::types::Position;

pub const NODE_RADIUS: f64 = 11.0;
pub const CENTER_RADIUS: f64 = 16.0;
pub const HIT_RADIUS: f64 = 16.0;
/// Pointer travel (screen px) below which a press on a node counts as a click.
pub const CLICK_TOLERANCE: f64 = 3.0;

#[derive(Clone, Debug, PartialEq)]
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

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	/// Largest screen distance travelled since the press.
	pub travel: f64,
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
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

/// Everything the canvas needs between frames: the simulation slot, the
/// zoom/pan transform and pointer interaction state.
pub struct ForceGraphState {
	pub slot: LayoutSlot,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	/// Heaviest visible edge, for weight styling.
	pub max_tx: u64,
	params: SimulationParams,
}

impl ForceGraphState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			slot: LayoutSlot::default(),
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
			max_tx: 0,
			params: SimulationParams::default(),
		}
	}

	pub fn origin(&self) -> Position {
		Position {
			x: self.width / 2.0,
			y: self.height / 2.0,
		}
	}

	/// Replace the running layout with one for `graph`.
	pub fn load(&mut self, graph: &FilteredGraph) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.hover = HoverState::default();
		if !graph.is_renderable() {
			self.slot.stop();
			self.max_tx = 0;
			return;
		}
		let origin = self.origin();
		let params = self.params;
		self.max_tx = self.slot.start(Simulation::new(graph, origin, params)).max_tx();
	}

	pub fn simulation(&self) -> Option<&Simulation> {
		self.slot.get()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// HIT_RADIUS is in world-space, scales with zoom like nodes
		self.slot.get()?.node_at(gx, gy, HIT_RADIUS)
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		let hit = self.node_at_position(x, y);
		let grabbed = match (hit, self.slot.get_mut()) {
			(Some(idx), Some(sim)) => sim.drag_start(idx).then_some(idx),
			_ => None,
		};
		if let Some(idx) = grabbed {
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				start_x: x,
				start_y: y,
				travel: 0.0,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		// Update hover state when not dragging
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			let (dx, dy) = (x - self.drag.start_x, y - self.drag.start_y);
			self.drag.travel = self.drag.travel.max((dx * dx + dy * dy).sqrt());
			let (gx, gy) = self.screen_to_graph(x, y);
			if let Some(sim) = self.slot.get_mut() {
				sim.drag_to(Position { x: gx, y: gy });
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// Finish a gesture. Returns the id of a clicked node, if the press
	/// on a node did not travel beyond [`CLICK_TOLERANCE`].
	pub fn pointer_up(&mut self) -> Option<String> {
		let drag = std::mem::take(&mut self.drag);
		self.pan.active = false;
		if !drag.active {
			return None;
		}
		let sim = self.slot.get_mut()?;
		sim.drag_end();
		let idx = drag.node_idx?;
		if drag.travel > CLICK_TOLERANCE {
			return None;
		}
		sim.nodes().get(idx).map(|n| n.id.clone())
	}

	pub fn pointer_leave(&mut self) {
		if self.drag.active {
			if let Some(sim) = self.slot.get_mut() {
				sim.drag_end();
			}
		}
		self.drag = DragState::default();
		self.pan.active = false;
		self.set_hover(None);
	}

	/// Zoom anchored on a screen point. Returns the new scale.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) -> f64 {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
		new_k
	}

	/// Set an absolute scale anchored on the canvas centre.
	pub fn set_zoom(&mut self, k: f64) {
		let k = clamp_zoom(k);
		if (k - self.transform.k).abs() < 1e-9 {
			return;
		}
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		self.zoom_at(cx, cy, k / self.transform.k);
	}

	pub fn reset_view(&mut self) {
		self.transform = ViewTransform::default();
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			if let Some(sim) = self.slot.get() {
				self.hover.neighbors.extend(sim.neighbors(idx));
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Advance the simulation and the hover fade by one frame.
	pub fn tick(&mut self, dt: f64) {
		if let Some(sim) = self.slot.get_mut() {
			sim.tick();
		}
		self.flow_time += dt;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		let origin = self.origin();
		if let Some(sim) = self.slot.get_mut() {
			sim.set_origin(origin);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::filter::filter;
	use super::super::simulation::Phase;
	use super::super::types::{GraphEdge, GraphNode, GraphSnapshot, GraphView};
	use super::*;

	fn loaded() -> ForceGraphState {
		let snap = GraphSnapshot::new(
			vec![GraphNode::new("0xAAA"), GraphNode::new("0xBBB")],
			vec![GraphEdge::new("0xAAA", "0xBBB", 5)],
			"0xaaa",
		);
		let mut state = ForceGraphState::new(800.0, 400.0);
		state.load(&filter(&snap, &GraphView::default()));
		state
	}

	fn screen_pos(state: &ForceGraphState, idx: usize) -> (f64, f64) {
		let p = state.simulation().unwrap().position(idx).unwrap();
		(
			p.x * state.transform.k + state.transform.x,
			p.y * state.transform.k + state.transform.y,
		)
	}

	#[test]
	fn press_and_release_in_place_is_a_click() {
		let mut state = loaded();
		let (x, y) = screen_pos(&state, 1);
		state.pointer_down(x, y);
		assert_eq!(state.simulation().unwrap().phase(), Phase::Dragging);
		state.pointer_move(x + 1.0, y + 1.0);
		assert_eq!(state.pointer_up(), Some("0xBBB".to_string()));
		assert_eq!(state.simulation().unwrap().phase(), Phase::Running);
	}

	#[test]
	fn dragging_past_tolerance_is_not_a_click() {
		let mut state = loaded();
		let (x, y) = screen_pos(&state, 0);
		state.pointer_down(x, y);
		state.pointer_move(x + 40.0, y);
		let (gx, gy) = state.screen_to_graph(x + 40.0, y);
		let pinned = state.simulation().unwrap().position(0).unwrap();
		assert_eq!((pinned.x, pinned.y), (gx, gy));
		assert_eq!(state.pointer_up(), None);
	}

	#[test]
	fn background_drag_pans() {
		let mut state = loaded();
		state.pointer_down(5.0, 5.0);
		assert!(state.pan.active);
		state.pointer_move(25.0, 15.0);
		assert_eq!((state.transform.x, state.transform.y), (20.0, 10.0));
		assert_eq!(state.pointer_up(), None);
		assert!(!state.pan.active);
	}

	#[test]
	fn zoom_is_clamped_and_reset_restores_identity() {
		let mut state = loaded();
		for _ in 0..40 {
			state.zoom_at(100.0, 100.0, 1.1);
		}
		assert_eq!(state.transform.k, MAX_ZOOM);
		state.set_zoom(0.01);
		assert_eq!(state.transform.k, MIN_ZOOM);
		state.reset_view();
		assert_eq!(state.transform, ViewTransform::default());
	}

	#[test]
	fn wheel_zoom_keeps_anchor_fixed() {
		let mut state = loaded();
		let before = state.screen_to_graph(200.0, 120.0);
		state.zoom_at(200.0, 120.0, 1.3);
		let after = state.screen_to_graph(200.0, 120.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn loading_an_empty_graph_stops_the_layout() {
		let mut state = loaded();
		assert!(state.simulation().is_some());
		state.load(&FilteredGraph::default());
		assert!(state.simulation().is_none());
	}

	#[test]
	fn resize_recentres_the_running_layout() {
		let mut state = loaded();
		state.resize(1000.0, 600.0);
		state.tick(0.016);
		let sim = state.simulation().unwrap();
		let n = sim.nodes().len() as f64;
		let (sx, sy) = (0..sim.nodes().len())
			.filter_map(|i| sim.position(i))
			.fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
		assert!((sx / n - 500.0).abs() < 1e-6);
		assert!((sy / n - 300.0).abs() < 1e-6);
	}

	#[test]
	fn edge_weight_scale_skips_dangling_edges() {
		let snap = GraphSnapshot::new(
			vec![GraphNode::new("0xA"), GraphNode::new("0xB")],
			vec![GraphEdge::new("0xA", "0xB", 5), GraphEdge::new("0xA", "0xZ", 100)],
			"0xa",
		);
		let mut state = ForceGraphState::new(800.0, 400.0);
		state.load(&filter(&snap, &GraphView::default()));
		assert_eq!(state.simulation().unwrap().links().len(), 1);
		assert_eq!(state.max_tx, 5);
	}

	#[test]
	fn hover_collects_neighbors() {
		let mut state = loaded();
		state.set_hover(Some(0));
		assert!(state.is_highlighted(1));
		assert!(state.is_hovered(0));
		state.set_hover(None);
		assert!(state.has_active_highlight());
		for _ in 0..400 {
			state.tick(0.016);
		}
		assert!(!state.has_active_highlight());
	}
}
