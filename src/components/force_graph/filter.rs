use std::collections::HashSet;

use super::types::{Direction, GraphEdge, GraphNode, GraphSnapshot, GraphView};

/// The subgraph that survives the current [`GraphView`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilteredGraph {
	/// Lowercased focal id (may be empty).
	pub center: String,
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl FilteredGraph {
	/// Whether there is anything worth laying out: a focal node that is
	/// present in the node list and at least one other node.
	pub fn is_renderable(&self) -> bool {
		!self.center.is_empty()
			&& self.nodes.len() >= 2
			&& self.nodes.iter().any(|n| n.key() == self.center)
	}

	pub fn as_snapshot(&self) -> GraphSnapshot {
		GraphSnapshot::new(self.nodes.clone(), self.edges.clone(), &self.center)
	}
}

fn direction_matches(edge: &GraphEdge, direction: Direction, center: &str) -> bool {
	match direction {
		Direction::Both => true,
		Direction::Out => edge.src.to_lowercase() == center,
		Direction::In => edge.dst.to_lowercase() == center,
	}
}

/// Derive the visible subgraph from a snapshot and the view parameters.
///
/// Edges keep snapshot order and are retained when `tx_count >= min_tx` and
/// the direction predicate holds. Nodes are the snapshot nodes whose id is
/// the center or an endpoint of a retained edge, again in snapshot order.
/// An empty center is still inserted into the id set; callers check
/// [`FilteredGraph::is_renderable`] instead of relying on it.
pub fn filter(snapshot: &GraphSnapshot, view: &GraphView) -> FilteredGraph {
	let center = snapshot.center.to_lowercase();

	let edges: Vec<GraphEdge> = snapshot
		.edges
		.iter()
		.filter(|e| e.tx_count >= view.min_tx && direction_matches(e, view.direction, &center))
		.cloned()
		.collect();

	let mut used: HashSet<String> = HashSet::with_capacity(edges.len() * 2 + 1);
	used.insert(center.clone());
	for edge in &edges {
		used.insert(edge.src.to_lowercase());
		used.insert(edge.dst.to_lowercase());
	}

	let nodes = snapshot
		.nodes
		.iter()
		.filter(|n| used.contains(&n.key()))
		.cloned()
		.collect();

	FilteredGraph {
		center,
		nodes,
		edges,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn snapshot() -> GraphSnapshot {
		GraphSnapshot::new(
			vec![
				GraphNode::new("0xAAA"),
				GraphNode::new("0xBBB"),
				GraphNode::new("0xCCC"),
				GraphNode::new("0xDDD"),
				GraphNode::new("0xEEE"),
			],
			vec![
				GraphEdge::new("0xAAA", "0xBBB", 5),
				GraphEdge::new("0xAAA", "0xCCC", 0),
				GraphEdge::new("0xDDD", "0xaaa", 3),
				GraphEdge::new("0xBBB", "0xDDD", 9),
			],
			"0xAAA",
		)
	}

	fn view(min_tx: u64, direction: Direction) -> GraphView {
		GraphView {
			min_tx,
			direction,
			scale: 1.0,
		}
	}

	fn ids(graph: &FilteredGraph) -> Vec<&str> {
		graph.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn neighbors_scenario_drops_zero_weight_edge() {
		let snap = GraphSnapshot::new(
			vec![
				GraphNode::new("0xAAA"),
				GraphNode::new("0xBBB"),
				GraphNode::new("0xCCC"),
			],
			vec![
				GraphEdge::new("0xAAA", "0xBBB", 5),
				GraphEdge::new("0xAAA", "0xCCC", 0),
			],
			"0xAAA",
		);
		let out = filter(&snap, &GraphView::default());
		assert_eq!(out.center, "0xaaa");
		assert_eq!(out.edges, vec![GraphEdge::new("0xAAA", "0xBBB", 5)]);
		assert_eq!(ids(&out), vec!["0xAAA", "0xBBB"]);
		assert!(out.is_renderable());
	}

	#[test]
	fn every_retained_edge_satisfies_the_view() {
		let snap = snapshot();
		for direction in Direction::ALL {
			for min_tx in 0..=10 {
				let v = view(min_tx, direction);
				let out = filter(&snap, &v);
				for e in &out.edges {
					assert!(e.tx_count >= min_tx);
					assert!(direction_matches(e, direction, &out.center));
				}
				for n in &out.nodes {
					let key = n.key();
					let is_endpoint = out
						.edges
						.iter()
						.any(|e| e.src.to_lowercase() == key || e.dst.to_lowercase() == key);
					assert!(key == out.center || is_endpoint, "{key} is dangling");
				}
			}
		}
	}

	#[test]
	fn direction_out_and_in_are_relative_to_center() {
		let snap = snapshot();
		let out = filter(&snap, &view(1, Direction::Out));
		assert_eq!(out.edges, vec![GraphEdge::new("0xAAA", "0xBBB", 5)]);
		assert_eq!(ids(&out), vec!["0xAAA", "0xBBB"]);

		let inbound = filter(&snap, &view(1, Direction::In));
		assert_eq!(inbound.edges, vec![GraphEdge::new("0xDDD", "0xaaa", 3)]);
		assert_eq!(ids(&inbound), vec!["0xAAA", "0xDDD"]);
	}

	#[test]
	fn both_keeps_edges_not_touching_center() {
		let out = filter(&snapshot(), &view(1, Direction::Both));
		assert_eq!(out.edges.len(), 3);
		assert_eq!(ids(&out), vec!["0xAAA", "0xBBB", "0xDDD"]);
	}

	#[test]
	fn filtering_is_idempotent() {
		let snap = snapshot();
		for direction in Direction::ALL {
			for min_tx in [0, 1, 4, 6, 20] {
				let v = view(min_tx, direction);
				let once = filter(&snap, &v);
				let twice = filter(&once.as_snapshot(), &v);
				assert_eq!(once, twice);
			}
		}
	}

	#[test]
	fn empty_center_is_never_renderable() {
		let mut snap = snapshot();
		snap.center.clear();
		let out = filter(&snap, &view(0, Direction::Both));
		assert_eq!(out.edges.len(), 4);
		assert!(!out.is_renderable());
	}

	#[test]
	fn center_missing_from_nodes_is_not_renderable() {
		let mut snap = snapshot();
		snap.center = "0xfff".into();
		let out = filter(&snap, &view(0, Direction::Both));
		assert!(!out.is_renderable());
	}
}
