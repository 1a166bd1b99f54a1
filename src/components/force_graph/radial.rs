//! Deterministic radial placement rendered as SVG.
//!
//! The focal node sits in the middle of a fixed view box and the other nodes
//! are spread evenly on an ellipse around it. Zoom only rescales the view box.

use std::collections::HashMap;
use std::f64::consts::PI;

use leptos::prelude::*;

use super::filter::FilteredGraph;
use super::scale::edge_style;
use super::state::{CENTER_RADIUS, NODE_RADIUS};
use super::types::Position;
use crate::format::short_addr;

pub const VIEW_WIDTH: f64 = 760.0;
pub const VIEW_HEIGHT: f64 = 340.0;
const RADIUS: f64 = 125.0;
const VERTICAL_FACTOR: f64 = 0.85;
const MAX_RING_NODES: usize = 16;
const MAX_EDGES: usize = 40;

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedNode {
	pub key: String,
	pub pos: Position,
	pub is_center: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedEdge {
	pub from: Position,
	pub to: Position,
	pub opacity: f64,
	pub width: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RadialLayout {
	pub nodes: Vec<PlacedNode>,
	pub edges: Vec<PlacedEdge>,
}

pub fn view_center() -> Position {
	Position {
		x: VIEW_WIDTH / 2.0,
		y: VIEW_HEIGHT / 2.0,
	}
}

/// Place the filtered graph. Returns an empty layout when not renderable.
pub fn radial_layout(graph: &FilteredGraph) -> RadialLayout {
	if !graph.is_renderable() {
		return RadialLayout::default();
	}
	let center = view_center();
	let mut placed = vec![PlacedNode {
		key: graph.center.clone(),
		pos: center,
		is_center: true,
	}];

	let ring: Vec<String> = graph
		.nodes
		.iter()
		.map(|n| n.key())
		.filter(|k| *k != graph.center)
		.take(MAX_RING_NODES)
		.collect();
	let slots = ring.len().max(1) as f64;
	for (i, key) in ring.into_iter().enumerate() {
		let angle = 2.0 * PI * i as f64 / slots;
		placed.push(PlacedNode {
			key,
			pos: Position {
				x: center.x + angle.cos() * RADIUS,
				y: center.y + angle.sin() * RADIUS * VERTICAL_FACTOR,
			},
			is_center: false,
		});
	}

	let by_key: HashMap<&str, Position> = placed.iter().map(|n| (n.key.as_str(), n.pos)).collect();
	let drawn: Vec<(Position, Position, u64)> = graph
		.edges
		.iter()
		.filter_map(|e| {
			let from = *by_key.get(e.src.to_lowercase().as_str())?;
			let to = *by_key.get(e.dst.to_lowercase().as_str())?;
			Some((from, to, e.tx_count))
		})
		.take(MAX_EDGES)
		.collect();
	// Weights are relative to the heaviest edge actually drawn.
	let max_tx = drawn.iter().map(|(_, _, tx)| *tx).max().unwrap_or(0);
	let edges = drawn
		.into_iter()
		.map(|(from, to, tx_count)| {
			let style = edge_style(tx_count, max_tx);
			PlacedEdge {
				from,
				to,
				opacity: style.opacity,
				width: style.width,
			}
		})
		.collect();

	RadialLayout {
		nodes: placed,
		edges,
	}
}

/// SVG `viewBox` for a zoom factor; always centred on the layout.
pub fn view_box(scale: f64) -> String {
	let scale = if scale > 0.0 && scale.is_finite() { scale } else { 1.0 };
	let (w, h) = (VIEW_WIDTH / scale, VIEW_HEIGHT / scale);
	format!(
		"{} {} {} {}",
		(VIEW_WIDTH - w) / 2.0,
		(VIEW_HEIGHT - h) / 2.0,
		w,
		h
	)
}

/// Static fallback renderer for the flow graph.
#[component]
pub fn RadialGraph(
	#[prop(into)] graph: Signal<FilteredGraph>,
	#[prop(into)] scale: Signal<f64>,
	/// Called with a node id when it is clicked.
	on_node_click: Callback<String>,
) -> impl IntoView {
	let layout = Memo::new(move |_| radial_layout(&graph.get()));

	view! {
		<svg
			class="graph-svg"
			viewBox=move || {
				if layout.with(|l| l.nodes.is_empty()) {
					view_box(1.0)
				} else {
					view_box(scale.get())
				}
			}
			preserveAspectRatio="xMidYMid meet"
		>
			{move || {
				let layout = layout.get();
				if layout.nodes.is_empty() {
					return view! {
						<text class="g-label" x="20" y="32">
							"No graph data yet. Load an address with neighbors."
						</text>
					}
						.into_any();
				}
				let lines = layout
					.edges
					.into_iter()
					.map(|e| {
						view! {
							<line
								class="g-link"
								x1=e.from.x.to_string()
								y1=e.from.y.to_string()
								x2=e.to.x.to_string()
								y2=e.to.y.to_string()
								stroke-opacity=format!("{:.2}", e.opacity)
								stroke-width=format!("{:.2}", e.width)
							/>
						}
					})
					.collect_view();
				let circles = layout
					.nodes
					.into_iter()
					.map(|n| {
						let label = short_addr(&n.key);
						let key = n.key.clone();
						let r = if n.is_center { CENTER_RADIUS } else { NODE_RADIUS };
						view! {
							<circle
								class="g-node g-click"
								class:center=n.is_center
								cx=n.pos.x.to_string()
								cy=n.pos.y.to_string()
								r=r.to_string()
								on:click=move |_| on_node_click.run(key.clone())
							/>
							<text
								class="g-label"
								x={(n.pos.x + 12.0).to_string()}
								y={(n.pos.y + 4.0).to_string()}
							>
								{label}
							</text>
						}
					})
					.collect_view();
				view! { <g>{lines}{circles}</g> }.into_any()
			}}
		</svg>
	}
}

#[cfg(test)]
mod tests {
	use super::super::filter::filter;
	use super::super::types::{GraphEdge, GraphNode, GraphSnapshot, GraphView};
	use super::*;

	fn star(leaves: usize) -> FilteredGraph {
		let mut nodes = vec![GraphNode::new("0xC")];
		let mut edges = Vec::new();
		for i in 0..leaves {
			let id = format!("0x{i:02}");
			edges.push(GraphEdge::new("0xc", id.clone(), i as u64 + 1));
			nodes.push(GraphNode::new(id));
		}
		filter(&GraphSnapshot::new(nodes, edges, "0xc"), &GraphView::default())
	}

	#[test]
	fn center_is_fixed_and_ring_is_even() {
		let layout = radial_layout(&star(4));
		assert_eq!(layout.nodes[0].pos, view_center());
		assert!(layout.nodes[0].is_center);

		let first = layout.nodes[1].pos;
		assert!((first.x - (380.0 + 125.0)).abs() < 1e-9);
		assert!((first.y - 170.0).abs() < 1e-9);
		let second = layout.nodes[2].pos;
		assert!((second.x - 380.0).abs() < 1e-9);
		assert!((second.y - (170.0 + 125.0 * 0.85)).abs() < 1e-9);
		assert_eq!(layout.edges.len(), 4);
	}

	#[test]
	fn ring_is_capped() {
		let layout = radial_layout(&star(30));
		assert_eq!(layout.nodes.len(), 17);
		assert_eq!(layout.edges.len(), 16);
	}

	#[test]
	fn layout_does_not_depend_on_zoom() {
		let graph = star(3);
		assert_eq!(radial_layout(&graph), radial_layout(&graph.clone()));
		assert_eq!(view_box(1.0), "0 0 760 340");
		assert_eq!(view_box(2.0), "190 85 380 170");
		assert_eq!(view_box(0.0), view_box(1.0));
	}

	#[test]
	fn weights_ignore_edges_that_are_not_drawn() {
		let snap = GraphSnapshot::new(
			vec![GraphNode::new("0xA"), GraphNode::new("0xB")],
			vec![GraphEdge::new("0xA", "0xB", 5), GraphEdge::new("0xA", "0xZ", 100)],
			"0xa",
		);
		let layout = radial_layout(&filter(&snap, &GraphView::default()));
		assert_eq!(layout.edges.len(), 1);
		assert!((layout.edges[0].opacity - 0.9).abs() < 1e-9);
		assert!((layout.edges[0].width - 4.0).abs() < 1e-9);
	}

	#[test]
	fn weights_ignore_edges_past_the_cap() {
		// Leaves beyond the ring cap carry the heaviest edges.
		let layout = radial_layout(&star(30));
		let heaviest = layout
			.edges
			.iter()
			.map(|e| e.width)
			.fold(0.0_f64, f64::max);
		assert!((heaviest - 4.0).abs() < 1e-9);
	}

	#[test]
	fn unrenderable_graph_has_empty_layout() {
		assert_eq!(radial_layout(&FilteredGraph::default()), RadialLayout::default());
	}
}
