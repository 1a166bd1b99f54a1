/// A graph vertex. Ids are address-like and compared case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
	pub id: String,
}

impl GraphNode {
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into() }
	}

	pub fn key(&self) -> String {
		self.id.to_lowercase()
	}
}

/// A directed edge weighted by interaction count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	pub src: String,
	pub dst: String,
	pub tx_count: u64,
}

impl GraphEdge {
	pub fn new(src: impl Into<String>, dst: impl Into<String>, tx_count: u64) -> Self {
		Self {
			src: src.into(),
			dst: dst.into(),
			tx_count,
		}
	}
}

/// Raw graph as fetched for one focal address (or the global sample).
///
/// Replaced wholesale on every fetch; never patched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	/// Lowercased focal id; empty for the unfocused view.
	pub center: String,
}

impl GraphSnapshot {
	pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>, center: &str) -> Self {
		Self {
			nodes,
			edges,
			center: center.trim().to_lowercase(),
		}
	}

	pub fn has_focus(&self) -> bool {
		!self.center.is_empty()
	}
}

/// Edge direction relative to the focal node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
	#[default]
	Both,
	Out,
	In,
}

impl Direction {
	pub const ALL: [Direction; 3] = [Direction::Both, Direction::Out, Direction::In];

	pub fn as_str(self) -> &'static str {
		match self {
			Direction::Both => "both",
			Direction::Out => "out",
			Direction::In => "in",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		match value.trim().to_ascii_lowercase().as_str() {
			"both" => Some(Direction::Both),
			"out" => Some(Direction::Out),
			"in" => Some(Direction::In),
			_ => None,
		}
	}
}

/// User-controlled filter and zoom parameters. Survives snapshot replacement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphView {
	pub min_tx: u64,
	pub direction: Direction,
	pub scale: f64,
}

impl Default for GraphView {
	fn default() -> Self {
		Self {
			min_tx: 1,
			direction: Direction::Both,
			scale: 1.0,
		}
	}
}

/// Which renderer draws the flow graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
	/// Continuously animated physics simulation on a canvas.
	#[default]
	Force,
	/// Static radial placement on SVG.
	Radial,
}

impl LayoutMode {
	pub fn parse(value: &str) -> Option<Self> {
		match value.trim().to_ascii_lowercase().as_str() {
			"force" => Some(LayoutMode::Force),
			"radial" => Some(LayoutMode::Radial),
			_ => None,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			LayoutMode::Force => "Force",
			LayoutMode::Radial => "Radial",
		}
	}

	pub fn toggled(self) -> Self {
		match self {
			LayoutMode::Force => LayoutMode::Radial,
			LayoutMode::Radial => LayoutMode::Force,
		}
	}
}

/// A 2D position in layout space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}
