use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::draw::ImageCache;
use super::events::GraphEvents;
use super::interaction::{Hover, HoverTracker, hit_test};
use super::layout::{ForceSimulation, Layout, Link};
use super::render;
use super::scheduler::{DeferredRunner, RenderScheduler};
use super::snapshot::Snapshot;
use super::store::{Change, GraphStore};
use super::surface::Surface;
use super::types::{Edge, Node};
use super::viewport::{PanState, Transform};

/// Engine-level tuning, independent of the layout solver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Alpha a scheduled restart re-energizes the layout to.
	pub restart_alpha: f64,
	/// Link length for edges without an explicit distance.
	pub link_distance: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			restart_alpha: 0.1,
			link_distance: 40.0,
		}
	}
}

/// A mutable node/edge graph kept in sync with a force layout and painted
/// on a [`Surface`].
///
/// Mutations that add records schedule one coalesced layout restart (see
/// [`NetworkGraph::run_scheduled`]); merges only repaint. The host drives
/// the animation by calling [`NetworkGraph::tick`] once per frame and
/// forwards pointer input to the `handle_*` methods.
pub struct NetworkGraph<S: Surface, X = (), L = ForceSimulation> {
	surface: Option<S>,
	images: ImageCache<S::Image>,
	store: GraphStore<X>,
	layout: L,
	config: GraphConfig,
	transform: Transform,
	size: (f64, f64),
	scheduler: RenderScheduler,
	hover: HoverTracker<X>,
	pan: PanState,
	suppress_click: bool,
	events: GraphEvents<X>,
	destroyed: bool,
}

impl<S: Surface, X: Clone> NetworkGraph<S, X, ForceSimulation> {
	/// Empty graph with the default force simulation.
	pub fn new(surface: S) -> Self {
		Self::restore(surface, Snapshot::default())
	}

	/// Rebuilds a graph from a [`NetworkGraph::dump`].
	pub fn restore(surface: S, snapshot: Snapshot<X>) -> Self {
		Self::with_layout(surface, snapshot, ForceSimulation::default())
	}
}

impl<S: Surface, X: Clone, L: Layout> NetworkGraph<S, X, L> {
	/// Graph built from `snapshot` and laid out by `layout`.
	pub fn with_layout(mut surface: S, snapshot: Snapshot<X>, mut layout: L) -> Self {
		let size = surface.fit();
		layout.set_center(size.0 / 2.0, size.1 / 2.0);
		if let Some(alpha) = snapshot.simulator_alpha {
			layout.set_alpha(alpha);
		}

		let mut store = GraphStore::new();
		for node in snapshot.nodes {
			store.restore_node(node);
		}
		for edge in snapshot.edges {
			store.add_edge(edge);
		}

		let mut graph = Self {
			surface: Some(surface),
			images: ImageCache::default(),
			store,
			layout,
			config: GraphConfig::default(),
			transform: snapshot.transform.map(Transform::clamped).unwrap_or_default(),
			size,
			scheduler: RenderScheduler::new(),
			hover: HoverTracker::default(),
			pan: PanState::default(),
			suppress_click: false,
			events: GraphEvents::default(),
			destroyed: false,
		};
		graph.sync_layout();
		debug!(
			"network-graph: created {}x{} with {} nodes, {} edges",
			size.0,
			size.1,
			graph.store.node_count(),
			graph.store.edge_count()
		);
		graph
	}

	/// Replaces the engine tuning.
	pub fn with_config(mut self, config: GraphConfig) -> Self {
		self.config = config;
		self
	}

	/// Reseeds the generator picking spawn angles for new nodes.
	pub fn seed(&mut self, seed: u64) {
		self.store.seed(seed);
	}

	/// Installs the host hook that arranges for [`NetworkGraph::run_scheduled`]
	/// to be called soon, e.g. a zero-delay timer.
	pub fn set_deferred_runner(&mut self, runner: DeferredRunner) {
		self.scheduler.set_runner(runner);
	}

	/// Backing node/edge store.
	pub fn store(&self) -> &GraphStore<X> {
		&self.store
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> &[Node<X>] {
		self.store.nodes()
	}

	/// Node with `id`, if present.
	pub fn node(&self, id: &str) -> Option<&Node<X>> {
		self.store.node(id)
	}

	/// Layout driving node positions.
	pub fn layout(&self) -> &L {
		&self.layout
	}

	/// Mutable layout, e.g. to retune it.
	pub fn layout_mut(&mut self) -> &mut L {
		&mut self.layout
	}

	/// Current viewport.
	pub fn transform(&self) -> Transform {
		self.transform
	}

	/// Surface size in CSS pixels, as of the last fit.
	pub fn size(&self) -> (f64, f64) {
		self.size
	}

	/// Channels to subscribe to.
	pub fn events(&mut self) -> &mut GraphEvents<X> {
		&mut self.events
	}

	/// `None` once destroyed.
	pub fn surface(&self) -> Option<&S> {
		self.surface.as_ref()
	}

	/// `None` once destroyed.
	pub fn surface_mut(&mut self) -> Option<&mut S> {
		self.surface.as_mut()
	}

	/// Whether [`NetworkGraph::destroy`] has run.
	pub fn is_destroyed(&self) -> bool {
		self.destroyed
	}

	/// Whether a layout restart is waiting for [`NetworkGraph::run_scheduled`].
	pub fn has_scheduled_render(&self) -> bool {
		self.scheduler.is_pending()
	}

	/// Inserts `node` near the rim of the graph, or merges it into the node
	/// with the same id via `merge(new, existing)`.
	pub fn add_or_merge_node<F>(&mut self, node: Node<X>, merge: F)
	where
		F: FnOnce(Node<X>, &Node<X>) -> Node<X>,
	{
		match self.store.add_or_merge_node(node, merge) {
			Change::Inserted => self.render(),
			Change::Merged => {
				self.redraw();
			}
		}
	}

	/// Adds `node`; an existing node takes over all of its attributes.
	pub fn add_node(&mut self, node: Node<X>) {
		self.add_or_merge_node(node, |new, _| new);
	}

	/// Adds `node` without a spawn position; the layout places it on the
	/// next restart.
	pub fn push_or_merge_node<F>(&mut self, node: Node<X>, merge: F)
	where
		F: FnOnce(&Node<X>) -> Node<X>,
	{
		match self.store.push_or_merge_node(node, merge) {
			Change::Inserted => self.render(),
			Change::Merged => {
				self.redraw();
			}
		}
	}

	/// Adds `edge`, or merges it into the stored edge between the same endpoints.
	pub fn add_edge(&mut self, edge: Edge) {
		match self.store.add_edge(edge) {
			Change::Inserted => self.render(),
			Change::Merged => {
				self.redraw();
			}
		}
	}

	/// Removes every node and edge and paints the empty frame.
	pub fn clear(&mut self) {
		self.store.clear();
		self.layout.set_links(Vec::new());
		self.images.clear();
		debug!("network-graph: cleared");
		self.render();
		self.redraw();
	}

	/// Schedules one layout restart. Calls made before it runs coalesce.
	pub fn render(&mut self) {
		if self.destroyed {
			return;
		}
		if self.scheduler.request() {
			trace!("network-graph: layout restart scheduled");
		}
	}

	/// Runs the pending restart, if any: hands the current nodes and links
	/// to the layout and re-heats it. Returns whether a restart happened.
	pub fn run_scheduled(&mut self) -> bool {
		if !self.scheduler.fire() || self.destroyed {
			return false;
		}
		self.sync_layout();
		self.layout.set_alpha(self.config.restart_alpha);
		self.layout.restart();
		debug!(
			"network-graph: layout restarted with {} nodes, {} edges",
			self.store.node_count(),
			self.store.edge_count()
		);
		true
	}

	fn sync_layout(&mut self) {
		let links: Vec<Link> = self
			.store
			.edges()
			.iter()
			.filter_map(|edge| {
				let endpoints = (
					self.store.node_position_index(&edge.source),
					self.store.node_position_index(&edge.target),
				);
				let (Some(source), Some(target)) = endpoints else {
					warn!("network-graph: skipping edge {} with a missing endpoint", edge.id());
					return None;
				};
				Some(Link {
					source,
					target,
					distance: edge.distance.unwrap_or(self.config.link_distance),
				})
			})
			.collect();
		self.layout.set_nodes(self.store.nodes_mut());
		self.layout.set_links(links);
	}

	/// One animation frame: advances the layout and repaints. Returns
	/// `false` when the layout is stopped.
	pub fn tick(&mut self) -> bool {
		if self.destroyed || !self.layout.is_running() {
			return false;
		}
		self.layout.step(self.store.nodes_mut());
		self.redraw();
		true
	}

	/// Repaints the current state. Returns `false` when there is no surface.
	pub fn redraw(&mut self) -> bool {
		let Some(surface) = self.surface.as_mut() else {
			return false;
		};
		render::render(
			surface,
			&mut self.images,
			&self.store,
			&self.transform,
			self.size,
		);
		true
	}

	/// Stops the layout and releases the surface, listeners and runner.
	pub fn destroy(&mut self) {
		if self.destroyed {
			return;
		}
		self.layout.stop();
		self.events.clear();
		self.scheduler.clear_runner();
		self.scheduler.fire();
		self.images.clear();
		self.surface = None;
		self.destroyed = true;
		debug!("network-graph: destroyed");
	}

	/// Re-reads the surface size and recenters the layout on it.
	pub fn resize(&mut self) {
		let Some(surface) = self.surface.as_mut() else {
			return;
		};
		self.size = surface.fit();
		self.layout.set_center(self.size.0 / 2.0, self.size.1 / 2.0);
		self.redraw();
	}

	/// Pans so node `id` sits in the middle of the viewport. No-op for
	/// unknown or unplaced nodes.
	pub fn focus_node(&mut self, id: &str) -> bool {
		let Some((x, y)) = self.store.node(id).and_then(Node::position) else {
			return false;
		};
		let transform = self.transform.centered_on(x, y, self.size.0, self.size.1);
		self.set_transform(transform);
		true
	}

	/// Snapshot of nodes, edges, viewport and layout heat.
	pub fn dump(&self) -> Snapshot<X> {
		Snapshot {
			nodes: self.store.nodes().to_vec(),
			edges: self.store.edges().iter().cloned().map(Edge::from).collect(),
			transform: Some(self.transform),
			simulator_alpha: Some(self.layout.alpha()),
		}
	}

	/// Applies a viewport change, repaints and emits `zoom`.
	pub fn set_transform(&mut self, transform: Transform) {
		self.transform = transform.clamped();
		self.redraw();
		self.events.zoom.emit(&self.transform);
	}

	/// Wheel zoom anchored at device point `(x, y)`.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		self.set_transform(self.transform.zoomed_at(x, y, factor));
	}

	/// Starts a background drag at device point `(x, y)`.
	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.pan.begin(x, y, self.transform);
	}

	/// Continues a drag. Returns whether a pan is in progress.
	pub fn pan_to(&mut self, x: f64, y: f64) -> bool {
		match self.pan.drag_to(x, y) {
			Some(transform) => {
				self.set_transform(transform);
				true
			}
			None => false,
		}
	}

	/// Ends a drag; a drag that moved swallows the click that follows it.
	pub fn end_pan(&mut self) {
		self.suppress_click = self.pan.end();
	}

	/// Graph-space point under device point `(x, y)`.
	pub fn to_graph(&self, x: f64, y: f64) -> (f64, f64) {
		self.transform.invert(x, y)
	}

	/// Node under device point `(x, y)`.
	pub fn node_at(&self, x: f64, y: f64) -> Option<&Node<X>> {
		let (gx, gy) = self.to_graph(x, y);
		hit_test(self.store.nodes(), gx, gy)
	}

	/// Pointer click at device point `(x, y)`; emits `click_node` on a
	/// visible node.
	pub fn handle_click(&mut self, x: f64, y: f64) {
		if std::mem::take(&mut self.suppress_click) {
			return;
		}
		let (gx, gy) = self.transform.invert(x, y);
		if let Some(node) = hit_test(self.store.nodes(), gx, gy) {
			if !node.hidden {
				self.events.click_node.emit(node);
			}
		}
	}

	/// Pointer move at device point `(x, y)`; emits enter/move/leave.
	pub fn handle_move(&mut self, x: f64, y: f64) {
		let (gx, gy) = self.transform.invert(x, y);
		let hit = hit_test(self.store.nodes(), gx, gy);
		for hover in self.hover.update(hit) {
			self.emit_hover(hover);
		}
	}

	/// Pointer left the surface.
	pub fn handle_leave(&mut self) {
		self.pan.end();
		if let Some(hover) = self.hover.reset() {
			self.emit_hover(hover);
		}
	}

	fn emit_hover(&mut self, hover: Hover<X>) {
		match hover {
			Hover::Enter(node) => self.events.enter_node.emit(&node),
			Hover::Move(node) => self.events.move_node.emit(&node),
			Hover::Leave(node) => self.events.leave_node.emit(&node),
		}
	}
}
