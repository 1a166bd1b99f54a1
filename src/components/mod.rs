pub mod feedback;
pub mod force_graph;
pub mod panels;
