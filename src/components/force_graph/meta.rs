use super::filter::FilteredGraph;
use super::types::{GraphView, LayoutMode};
use crate::format::short_addr;

pub const EMPTY_META: &str = "nodes=0 edges=0";

/// One-line status shown under the graph.
pub fn graph_meta(graph: &FilteredGraph, view: &GraphView, mode: LayoutMode) -> String {
	if !graph.is_renderable() {
		return EMPTY_META.to_string();
	}
	let mut meta = format!(
		"nodes={} edges={} center={} minTx={} dir={}",
		graph.nodes.len(),
		graph.edges.len(),
		short_addr(&graph.center),
		view.min_tx,
		view.direction.as_str(),
	);
	if mode == LayoutMode::Force {
		meta.push_str(&format!(" zoom={:.2}x", view.scale));
	}
	meta
}
