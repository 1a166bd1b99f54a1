//! Velocity-Verlet style force simulation with alpha cooling.
//!
//! Each tick adds link, many-body and centering contributions, integrates
//! positions with velocity decay and then runs a collision pass that pushes
//! overlapping nodes apart. Energy (`alpha`) decays toward `alpha_target`;
//! dragging raises the target so the rest of the layout reacts.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::filter::FilteredGraph;
use super::types::Position;

const ALPHA_DECAY_TICKS: f64 = 300.0;
const DRAG_ALPHA_TARGET: f64 = 0.3;
const DISTANCE_MIN_SQ: f64 = 1.0;
const INITIAL_RADIUS: f64 = 10.0;

/// Tunables for the forces and the cooling schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
	/// Rest length of a link spring.
	pub link_distance: f64,
	pub link_strength: f64,
	/// Many-body strength; negative repels.
	pub charge: f64,
	/// Per-node collision radius; two nodes keep `2 * collide_radius` apart.
	pub collide_radius: f64,
	pub velocity_decay: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
}

impl Default for SimulationParams {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 90.0,
			link_strength: 0.7,
			charge: -180.0,
			collide_radius: 22.0,
			velocity_decay: 0.4,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / ALPHA_DECAY_TICKS),
		}
	}
}

/// Lifecycle of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Idle,
	Running,
	Dragging,
	/// Energy fell below `alpha_min`; a drag reheats it.
	Settled,
	/// Released by its owner. Terminal.
	Stopped,
}

#[derive(Clone, Debug)]
pub struct SimNode {
	pub id: String,
	pub key: String,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned position; excluded from integration while set.
	pub fixed: Option<Position>,
}

#[derive(Clone, Copy, Debug)]
pub struct SimLink {
	pub source: usize,
	pub target: usize,
	pub tx_count: u64,
	bias: f64,
}

pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	center_idx: Option<usize>,
	origin: Position,
	params: SimulationParams,
	alpha: f64,
	alpha_target: f64,
	phase: Phase,
	dragged: Option<usize>,
}

/// Tiny deterministic offset used when two points coincide.
fn jiggle(a: usize, b: usize) -> (f64, f64) {
	let angle = ((a as f64) * 0.618_034 + (b as f64) * 0.414_214 + 0.37) * 2.0 * PI;
	(angle.cos() * 1e-3, angle.sin() * 1e-3)
}

impl Simulation {
	/// Build a simulation over a filtered graph, seeded in a phyllotaxis
	/// spiral around `origin`. Edges whose endpoints are not nodes are skipped.
	pub fn new(graph: &FilteredGraph, origin: Position, params: SimulationParams) -> Self {
		let mut index: HashMap<String, usize> = HashMap::with_capacity(graph.nodes.len());
		let mut nodes = Vec::with_capacity(graph.nodes.len());
		let golden = PI * (3.0 - 5f64.sqrt());

		for node in &graph.nodes {
			let key = node.key();
			if index.contains_key(&key) {
				continue;
			}
			let i = nodes.len();
			let (r, a) = (INITIAL_RADIUS * (0.5 + i as f64).sqrt(), i as f64 * golden);
			index.insert(key.clone(), i);
			nodes.push(SimNode {
				id: node.id.clone(),
				key,
				x: origin.x + r * a.cos(),
				y: origin.y + r * a.sin(),
				vx: 0.0,
				vy: 0.0,
				fixed: None,
			});
		}

		let mut degree = vec![0usize; nodes.len()];
		let mut pairs = Vec::with_capacity(graph.edges.len());
		for edge in &graph.edges {
			let (Some(&s), Some(&t)) = (
				index.get(&edge.src.to_lowercase()),
				index.get(&edge.dst.to_lowercase()),
			) else {
				continue;
			};
			degree[s] += 1;
			degree[t] += 1;
			pairs.push((s, t, edge.tx_count));
		}
		let links = pairs
			.into_iter()
			.map(|(source, target, tx_count)| SimLink {
				source,
				target,
				tx_count,
				bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
			})
			.collect();

		Self {
			center_idx: index.get(&graph.center).copied(),
			nodes,
			links,
			origin,
			params,
			alpha: 1.0,
			alpha_target: 0.0,
			phase: Phase::Idle,
			dragged: None,
		}
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[SimLink] {
		&self.links
	}

	/// Heaviest link that is laid out, 0 without links.
	pub fn max_tx(&self) -> u64 {
		self.links.iter().map(|l| l.tx_count).max().unwrap_or(0)
	}

	pub fn center_index(&self) -> Option<usize> {
		self.center_idx
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn is_active(&self) -> bool {
		matches!(self.phase, Phase::Running | Phase::Dragging)
	}

	pub fn start(&mut self) {
		if self.phase == Phase::Idle {
			self.phase = Phase::Running;
		}
	}

	pub fn stop(&mut self) {
		self.phase = Phase::Stopped;
		self.dragged = None;
		for node in &mut self.nodes {
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}

	/// Move the layout anchor, e.g. after a canvas resize.
	pub fn set_origin(&mut self, origin: Position) {
		self.origin = origin;
	}

	pub fn position(&self, idx: usize) -> Option<Position> {
		self.nodes.get(idx).map(|n| Position { x: n.x, y: n.y })
	}

	/// Topmost node within `radius` of a layout-space point.
	pub fn node_at(&self, x: f64, y: f64, radius: f64) -> Option<usize> {
		self.nodes
			.iter()
			.enumerate()
			.rev()
			.find(|(_, n)| {
				let (dx, dy) = (n.x - x, n.y - y);
				dx * dx + dy * dy < radius * radius
			})
			.map(|(i, _)| i)
	}

	/// Indices of nodes sharing a link with `idx`.
	pub fn neighbors(&self, idx: usize) -> Vec<usize> {
		self.links
			.iter()
			.filter_map(|l| {
				if l.source == idx {
					Some(l.target)
				} else if l.target == idx {
					Some(l.source)
				} else {
					None
				}
			})
			.collect()
	}

	/// Pin a node and reheat. Returns false when the simulation cannot be dragged.
	pub fn drag_start(&mut self, idx: usize) -> bool {
		if matches!(self.phase, Phase::Idle | Phase::Stopped) || idx >= self.nodes.len() {
			return false;
		}
		let node = &mut self.nodes[idx];
		node.fixed = Some(Position { x: node.x, y: node.y });
		self.dragged = Some(idx);
		self.alpha_target = DRAG_ALPHA_TARGET;
		self.phase = Phase::Dragging;
		true
	}

	pub fn drag_to(&mut self, pos: Position) {
		let Some(idx) = self.dragged else {
			return;
		};
		let node = &mut self.nodes[idx];
		node.fixed = Some(pos);
		node.x = pos.x;
		node.y = pos.y;
	}

	/// Release the pin and let energy decay back toward rest.
	pub fn drag_end(&mut self) {
		let Some(idx) = self.dragged.take() else {
			return;
		};
		self.nodes[idx].fixed = None;
		self.alpha_target = 0.0;
		if self.phase == Phase::Dragging {
			self.phase = Phase::Running;
		}
	}

	/// Advance one step. Returns whether positions changed.
	pub fn tick(&mut self) -> bool {
		if !self.is_active() {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.integrate();
		self.apply_centering();
		self.apply_collision();

		if self.phase == Phase::Running && self.alpha < self.params.alpha_min {
			self.phase = Phase::Settled;
			debug_assert!(self.dragged.is_none());
		}
		true
	}

	fn apply_links(&mut self) {
		let (distance, strength, alpha) =
			(self.params.link_distance, self.params.link_strength, self.alpha);
		for link in &self.links {
			if link.source == link.target {
				continue;
			}
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 && y == 0.0 {
				(x, y) = jiggle(link.source, link.target);
			}
			let l = (x * x + y * y).sqrt();
			let k = (l - distance) / l * alpha * strength;
			let (x, y) = (x * k, y * k);

			let t = &mut self.nodes[link.target];
			t.vx -= x * link.bias;
			t.vy -= y * link.bias;
			let s = &mut self.nodes[link.source];
			s.vx += x * (1.0 - link.bias);
			s.vy += y * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self) {
		let w = self.params.charge * self.alpha;
		let n = self.nodes.len();
		for i in 0..n {
			let (mut fx, mut fy) = (0.0, 0.0);
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut x = self.nodes[j].x - self.nodes[i].x;
				let mut y = self.nodes[j].y - self.nodes[i].y;
				let mut l = x * x + y * y;
				if l == 0.0 {
					(x, y) = jiggle(i, j);
					l = x * x + y * y;
				}
				if l < DISTANCE_MIN_SQ {
					l = (DISTANCE_MIN_SQ * l).sqrt();
				}
				fx += x * w / l;
				fy += y * w / l;
			}
			self.nodes[i].vx += fx;
			self.nodes[i].vy += fy;
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.params.velocity_decay;
		for node in &mut self.nodes {
			match node.fixed {
				Some(pin) => {
					node.x = pin.x;
					node.y = pin.y;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				None => {
					node.vx *= keep;
					node.vy *= keep;
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}
	}

	/// Translate free nodes so the mean position sits on the origin.
	fn apply_centering(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (dx, dy) = (sx / n - self.origin.x, sy / n - self.origin.y);
		for node in self.nodes.iter_mut().filter(|n| n.fixed.is_none()) {
			node.x -= dx;
			node.y -= dy;
		}
	}

	/// Push apart every pair closer than twice the collision radius.
	fn apply_collision(&mut self) {
		let min = self.params.collide_radius * 2.0;
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (pi, pj) = (self.nodes[i].fixed.is_some(), self.nodes[j].fixed.is_some());
				if pi && pj {
					continue;
				}
				let mut dx = self.nodes[j].x - self.nodes[i].x;
				let mut dy = self.nodes[j].y - self.nodes[i].y;
				let mut dist = (dx * dx + dy * dy).sqrt();
				if dist >= min {
					continue;
				}
				if dist < 1e-9 {
					(dx, dy) = jiggle(i, j);
					dist = (dx * dx + dy * dy).sqrt();
				}
				let overlap = min - dist;
				let (ux, uy) = (dx / dist, dy / dist);
				let (share_i, share_j) = match (pi, pj) {
					(true, false) => (0.0, 1.0),
					(false, true) => (1.0, 0.0),
					_ => (0.5, 0.5),
				};
				let a = &mut self.nodes[i];
				a.x -= ux * overlap * share_i;
				a.y -= uy * overlap * share_i;
				let b = &mut self.nodes[j];
				b.x += ux * overlap * share_j;
				b.y += uy * overlap * share_j;
			}
		}
	}
}

/// Owner of the single simulation bound to a canvas.
///
/// Starting a layout always stops and drops the previous one first, so two
/// simulations can never drive the same canvas.
#[derive(Default)]
pub struct LayoutSlot {
	active: Option<Simulation>,
	generation: u64,
}

impl LayoutSlot {
	pub fn start(&mut self, mut simulation: Simulation) -> &mut Simulation {
		self.stop();
		simulation.start();
		self.generation += 1;
		self.active.insert(simulation)
	}

	pub fn stop(&mut self) {
		if let Some(mut old) = self.active.take() {
			old.stop();
		}
	}

	pub fn get(&self) -> Option<&Simulation> {
		self.active.as_ref()
	}

	pub fn get_mut(&mut self) -> Option<&mut Simulation> {
		self.active.as_mut()
	}

	/// Incremented on every `start`.
	pub fn generation(&self) -> u64 {
		self.generation
	}
}

#[cfg(test)]
mod tests {
	use super::super::filter::filter;
	use super::super::types::{GraphEdge, GraphNode, GraphSnapshot, GraphView};
	use super::*;

	const ORIGIN: Position = Position { x: 380.0, y: 210.0 };

	fn star(leaves: usize) -> FilteredGraph {
		let mut nodes = vec![GraphNode::new("0xc")];
		let mut edges = Vec::new();
		for i in 0..leaves {
			let id = format!("0x{i}");
			edges.push(GraphEdge::new("0xc", id.clone(), (i + 1) as u64));
			nodes.push(GraphNode::new(id));
		}
		filter(&GraphSnapshot::new(nodes, edges, "0xc"), &GraphView::default())
	}

	fn distance(sim: &Simulation, a: usize, b: usize) -> f64 {
		let (pa, pb) = (sim.position(a).unwrap(), sim.position(b).unwrap());
		((pa.x - pb.x).powi(2) + (pa.y - pb.y).powi(2)).sqrt()
	}

	fn run_until_settled(sim: &mut Simulation) -> usize {
		let mut ticks = 0;
		while sim.tick() {
			ticks += 1;
			assert!(ticks < 2_000, "simulation never settled");
		}
		ticks
	}

	#[test]
	fn phases_follow_lifecycle() {
		let mut sim = Simulation::new(&star(3), ORIGIN, SimulationParams::default());
		assert_eq!(sim.phase(), Phase::Idle);
		assert!(!sim.tick());

		sim.start();
		assert_eq!(sim.phase(), Phase::Running);
		let ticks = run_until_settled(&mut sim);
		assert!(ticks > 100);
		assert_eq!(sim.phase(), Phase::Settled);
		assert!(sim.alpha() < SimulationParams::default().alpha_min);

		sim.stop();
		assert_eq!(sim.phase(), Phase::Stopped);
		assert!(!sim.drag_start(0));
		assert!(!sim.tick());
	}

	#[test]
	fn edges_to_unknown_nodes_are_skipped() {
		let graph = FilteredGraph {
			center: "0xa".into(),
			nodes: vec![GraphNode::new("0xA"), GraphNode::new("0xB")],
			edges: vec![GraphEdge::new("0xa", "0xb", 2), GraphEdge::new("0xa", "0xz", 9)],
		};
		let sim = Simulation::new(&graph, ORIGIN, SimulationParams::default());
		assert_eq!(sim.links().len(), 1);
		assert_eq!(sim.center_index(), Some(0));
	}

	#[test]
	fn settled_star_keeps_leaves_near_link_distance() {
		let mut sim = Simulation::new(&star(5), ORIGIN, SimulationParams::default());
		sim.start();
		run_until_settled(&mut sim);

		for leaf in 1..=5 {
			let d = distance(&sim, 0, leaf);
			assert!(d > 60.0 && d < 160.0, "leaf {leaf} at {d}");
		}
		for a in 0..6 {
			for b in (a + 1)..6 {
				assert!(distance(&sim, a, b) >= 43.0);
			}
		}

		let (sx, sy) = sim
			.nodes()
			.iter()
			.fold((0.0, 0.0), |(x, y), n| (x + n.x, y + n.y));
		assert!((sx / 6.0 - ORIGIN.x).abs() < 1.0);
		assert!((sy / 6.0 - ORIGIN.y).abs() < 1.0);
	}

	#[test]
	fn collision_separates_coincident_nodes() {
		let graph = FilteredGraph {
			center: "0xa".into(),
			nodes: vec![GraphNode::new("0xa"), GraphNode::new("0xb")],
			edges: vec![],
		};
		let mut sim = Simulation::new(&graph, ORIGIN, SimulationParams::default());
		sim.start();
		assert!(sim.drag_start(1));
		sim.drag_to(Position { x: 100.0, y: 100.0 });
		sim.drag_end();
		sim.nodes[0].x = 100.0;
		sim.nodes[0].y = 100.0;
		sim.nodes[0].vx = 0.0;
		sim.nodes[0].vy = 0.0;

		sim.tick();
		assert!(distance(&sim, 0, 1) >= 44.0 - 1e-6);
	}

	#[test]
	fn dragging_pins_and_reheats() {
		let mut sim = Simulation::new(&star(4), ORIGIN, SimulationParams::default());
		sim.start();
		run_until_settled(&mut sim);
		let settled_alpha = sim.alpha();

		assert!(sim.drag_start(2));
		assert_eq!(sim.phase(), Phase::Dragging);
		assert_eq!(sim.alpha_target(), 0.3);

		let pin = Position { x: 50.0, y: 60.0 };
		sim.drag_to(pin);
		for _ in 0..30 {
			assert!(sim.tick());
			assert_eq!(sim.position(2), Some(pin));
		}
		assert!(sim.alpha() > settled_alpha);

		sim.drag_end();
		assert_eq!(sim.phase(), Phase::Running);
		assert_eq!(sim.alpha_target(), 0.0);
		assert!(sim.nodes()[2].fixed.is_none());
		run_until_settled(&mut sim);
		assert_eq!(sim.phase(), Phase::Settled);
	}

	#[test]
	fn hit_test_prefers_topmost_node() {
		let sim = Simulation::new(&star(2), ORIGIN, SimulationParams::default());
		let p = sim.position(2).unwrap();
		assert_eq!(sim.node_at(p.x, p.y, 1.0), Some(2));
		assert_eq!(sim.node_at(p.x + 500.0, p.y, 1.0), None);
		assert_eq!(sim.neighbors(0), vec![1, 2]);
	}

	#[test]
	fn slot_holds_a_single_simulation() {
		let mut slot = LayoutSlot::default();
		assert!(slot.get().is_none());

		slot.start(Simulation::new(&star(2), ORIGIN, SimulationParams::default()));
		assert_eq!(slot.generation(), 1);
		assert_eq!(slot.get().map(Simulation::phase), Some(Phase::Running));

		let replacement = slot.start(Simulation::new(&star(5), ORIGIN, SimulationParams::default()));
		assert_eq!(replacement.nodes().len(), 6);
		assert_eq!(slot.generation(), 2);

		slot.stop();
		assert!(slot.get_mut().is_none());
	}
}
