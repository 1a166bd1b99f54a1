//! Flow graph engine: filtering, layout (physics or radial) and rendering.

mod component;
pub mod filter;
pub mod meta;
pub mod radial;
mod render;
pub mod scale;
pub mod simulation;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use filter::{FilteredGraph, filter};
pub use meta::graph_meta;
pub use radial::RadialGraph;
pub use types::{Direction, GraphEdge, GraphNode, GraphSnapshot, GraphView, LayoutMode, Position};
