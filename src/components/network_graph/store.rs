use std::collections::HashMap;
use std::f64::consts::PI;

use super::types::{CanonicalEdge, Edge, Node, edge_id};

/// Outcome of an add call; tells the engine whether to re-seed the layout
/// or only repaint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
	/// A new record was inserted.
	Inserted,
	/// An existing record was updated in place.
	Merged,
}

/// Axis-aligned box around all placed nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	/// Left edge.
	pub min_x: f64,
	/// Top edge.
	pub min_y: f64,
	/// Right edge.
	pub max_x: f64,
	/// Bottom edge.
	pub max_y: f64,
}

impl Bounds {
	/// Horizontal extent.
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	/// Vertical extent.
	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	/// Midpoint of the box.
	pub fn center(&self) -> (f64, f64) {
		(
			self.min_x + self.width() / 2.0,
			self.min_y + self.height() / 2.0,
		)
	}
}

/// Small deterministic generator for spawn angles.
#[derive(Clone, Debug)]
pub(crate) struct SpawnRng {
	state: u64,
}

impl SpawnRng {
	const MODULUS: u64 = 233_280;

	pub(crate) fn new(seed: u64) -> Self {
		Self {
			state: seed % Self::MODULUS,
		}
	}

	/// Next value in `[0, 1)`.
	pub(crate) fn next_f64(&mut self) -> f64 {
		self.state = (self.state * 9301 + 49297) % Self::MODULUS;
		self.state as f64 / Self::MODULUS as f64
	}
}

/// Canonical node and edge collections with id indexes.
pub struct GraphStore<X> {
	nodes: Vec<Node<X>>,
	node_index: HashMap<String, usize>,
	edges: Vec<CanonicalEdge>,
	edge_index: HashMap<String, usize>,
	rng: SpawnRng,
}

impl<X> Default for GraphStore<X> {
	fn default() -> Self {
		Self::new()
	}
}

impl<X> GraphStore<X> {
	/// Empty store.
	pub fn new() -> Self {
		Self {
			nodes: Vec::new(),
			node_index: HashMap::new(),
			edges: Vec::new(),
			edge_index: HashMap::new(),
			rng: SpawnRng::new(0),
		}
	}

	/// Reseeds the generator used for spawn angles.
	pub fn seed(&mut self, seed: u64) {
		self.rng = SpawnRng::new(seed);
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> &[Node<X>] {
		&self.nodes
	}

	pub(crate) fn nodes_mut(&mut self) -> &mut [Node<X>] {
		&mut self.nodes
	}

	/// Canonical edges in insertion order.
	pub fn edges(&self) -> &[CanonicalEdge] {
		&self.edges
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Node with `id`, if present.
	pub fn node(&self, id: &str) -> Option<&Node<X>> {
		self.node_index.get(id).map(|&i| &self.nodes[i])
	}

	/// Position of `id` in [`GraphStore::nodes`].
	pub fn node_position_index(&self, id: &str) -> Option<usize> {
		self.node_index.get(id).copied()
	}

	/// Edge between `a` and `b`, in either order.
	pub fn edge(&self, a: &str, b: &str) -> Option<&CanonicalEdge> {
		self.edge_index.get(&edge_id(a, b)).map(|&i| &self.edges[i])
	}

	/// Bounding box of placed nodes, `None` when nothing is placed.
	pub fn bounds(&self) -> Option<Bounds> {
		let mut placed = self.nodes.iter().filter_map(Node::position);
		let (x, y) = placed.next()?;
		let mut bounds = Bounds {
			min_x: x,
			min_y: y,
			max_x: x,
			max_y: y,
		};
		for (x, y) in placed {
			bounds.min_x = bounds.min_x.min(x);
			bounds.min_y = bounds.min_y.min(y);
			bounds.max_x = bounds.max_x.max(x);
			bounds.max_y = bounds.max_y.max(y);
		}
		Some(bounds)
	}

	/// Point on the rim of the current graph, so new nodes do not pile up in
	/// the middle.
	fn spawn_point(&mut self) -> (f64, f64) {
		let bounds = self.bounds().unwrap_or_default();
		let radius = bounds.width().hypot(bounds.height()) / 2.0;
		let (cx, cy) = bounds.center();
		let angle = self.rng.next_f64() * 2.0 * PI;
		(cx + radius * angle.cos(), cy + radius * angle.sin())
	}

	fn insert_node(&mut self, node: Node<X>) {
		self.node_index.insert(node.id.clone(), self.nodes.len());
		self.nodes.push(node);
	}

	/// Inserts `node` at a spawn point, or replaces the attributes of the
	/// existing node with `merge(node, existing)`.
	///
	/// The id and body of an existing node are never touched by a merge.
	pub fn add_or_merge_node<F>(&mut self, mut node: Node<X>, merge: F) -> Change
	where
		F: FnOnce(Node<X>, &Node<X>) -> Node<X>,
	{
		match self.node_index.get(&node.id) {
			Some(&i) => {
				let existing = &mut self.nodes[i];
				let merged = merge(node, existing);
				*existing = Node {
					id: std::mem::take(&mut existing.id),
					body: existing.body,
					..merged
				};
				Change::Merged
			}
			None => {
				let (x, y) = self.spawn_point();
				node.body.place(x, y);
				self.insert_node(node);
				Change::Inserted
			}
		}
	}

	/// Like [`GraphStore::add_or_merge_node`] but leaves new nodes unplaced
	/// and passes only the existing node to `merge`.
	pub fn push_or_merge_node<F>(&mut self, node: Node<X>, merge: F) -> Change
	where
		F: FnOnce(&Node<X>) -> Node<X>,
	{
		match self.node_index.get(&node.id) {
			Some(&i) => {
				let existing = &mut self.nodes[i];
				let merged = merge(existing);
				*existing = Node {
					id: std::mem::take(&mut existing.id),
					body: existing.body,
					..merged
				};
				Change::Merged
			}
			None => {
				self.insert_node(node);
				Change::Inserted
			}
		}
	}

	/// Inserts a restored node verbatim, body included. Existing ids are
	/// overwritten.
	pub(crate) fn restore_node(&mut self, node: Node<X>) {
		match self.node_index.get(&node.id) {
			Some(&i) => self.nodes[i] = node,
			None => self.insert_node(node),
		}
	}

	/// Inserts the canonical form of `edge` or applies the duplex merge rule
	/// to the stored one. Distance is kept from the first add.
	pub fn add_edge(&mut self, edge: Edge) -> Change {
		let edge = edge.canonical();
		let id = edge.id();
		match self.edge_index.get(&id) {
			Some(&i) => {
				let existing = &mut self.edges[i];
				existing.direction = existing.direction.merged_with(edge.direction);
				Change::Merged
			}
			None => {
				self.edge_index.insert(id, self.edges.len());
				self.edges.push(edge);
				Change::Inserted
			}
		}
	}

	/// Drops every node and edge. The spawn generator keeps its state.
	pub fn clear(&mut self) {
		self.nodes.clear();
		self.node_index.clear();
		self.edges.clear();
		self.edge_index.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::types::EdgeDirection;

	fn pass<X>(node: Node<X>, _: &Node<X>) -> Node<X> {
		node
	}

	#[test]
	fn first_node_spawns_at_origin() {
		let mut store = GraphStore::new();
		assert_eq!(store.add_or_merge_node(Node::new("a", ()), pass), Change::Inserted);
		assert_eq!(store.node("a").unwrap().position(), Some((0.0, 0.0)));
	}

	#[test]
	fn new_nodes_spawn_on_the_rim() {
		let mut store = GraphStore::new();
		store.restore_node(Node::new("a", ()).with_position(0.0, 0.0));
		store.restore_node(Node::new("b", ()).with_position(30.0, 40.0));
		store.add_or_merge_node(Node::new("c", ()), pass);

		let (x, y) = store.node("c").unwrap().position().unwrap();
		let distance = (x - 15.0).hypot(y - 20.0);
		assert!((distance - 25.0).abs() < 1e-9, "distance was {distance}");
	}

	#[test]
	fn merge_keeps_body_and_count() {
		let mut store = GraphStore::new();
		store.add_or_merge_node(Node::new("a", 1u32).with_label("old"), pass);
		let before = *store.node("a").unwrap().body();

		let change = store.add_or_merge_node(Node::new("a", 2u32).with_label("new"), |new, old| {
			Node {
				extra: new.extra + old.extra,
				..new
			}
		});

		assert_eq!(change, Change::Merged);
		assert_eq!(store.node_count(), 1);
		let node = store.node("a").unwrap();
		assert_eq!(node.label.as_deref(), Some("new"));
		assert_eq!(node.extra, 3);
		assert_eq!(*node.body(), before);
	}

	#[test]
	fn push_leaves_new_nodes_unplaced() {
		let mut store = GraphStore::new();
		store.push_or_merge_node(Node::new("a", ()), Node::clone);
		assert_eq!(store.node("a").unwrap().position(), None);
	}

	#[test]
	fn reversed_edge_with_same_arrow_is_not_upgraded() {
		let mut store = GraphStore::<()>::new();
		store.add_edge(Edge::new("a", "b").with_direction(EdgeDirection::Target));
		assert_eq!(
			store.add_edge(Edge::new("b", "a").with_direction(EdgeDirection::Source)),
			Change::Merged
		);
		assert_eq!(store.edge_count(), 1);
		assert_eq!(store.edge("a", "b").unwrap().direction, EdgeDirection::Target);
	}

	#[test]
	fn conflicting_edge_becomes_duplex() {
		let mut store = GraphStore::<()>::new();
		store.add_edge(
			Edge::new("a", "b")
				.with_direction(EdgeDirection::Target)
				.with_distance(80.0),
		);
		store.add_edge(
			Edge::new("a", "b")
				.with_direction(EdgeDirection::Source)
				.with_distance(10.0),
		);
		let edge = store.edge("b", "a").unwrap();
		assert_eq!(edge.direction, EdgeDirection::Duplex);
		assert_eq!(edge.distance, Some(80.0));
	}

	#[test]
	fn clear_empties_indexes() {
		let mut store = GraphStore::new();
		store.add_or_merge_node(Node::new("a", ()), pass);
		store.add_edge(Edge::new("a", "b"));
		store.clear();
		assert_eq!(store.node_count(), 0);
		assert_eq!(store.edge_count(), 0);
		assert!(store.node("a").is_none());
		assert!(store.edge("a", "b").is_none());
		assert_eq!(store.add_or_merge_node(Node::new("a", ()), pass), Change::Inserted);
	}
}
