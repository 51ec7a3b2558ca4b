use super::draw::RADIUS;
use super::types::Node;

const RADIUS_2: f64 = RADIUS * RADIUS;

/// First visible, placed node within [`RADIUS`] of graph point `(x, y)`.
pub fn hit_test<X>(nodes: &[Node<X>], x: f64, y: f64) -> Option<&Node<X>> {
	nodes.iter().find(|node| {
		if node.hidden {
			return false;
		}
		let Some((nx, ny)) = node.position() else {
			return false;
		};
		let (dx, dy) = (x - nx, y - ny);
		dx * dx + dy * dy < RADIUS_2
	})
}

/// Semantic pointer event produced by [`HoverTracker::update`].
#[derive(Clone, Debug, PartialEq)]
pub enum Hover<X> {
	Enter(Node<X>),
	Move(Node<X>),
	Leave(Node<X>),
}

/// Remembers which node the pointer was last over.
#[derive(Clone, Debug)]
pub struct HoverTracker<X> {
	current: Option<Node<X>>,
}

impl<X> Default for HoverTracker<X> {
	fn default() -> Self {
		Self { current: None }
	}
}

impl<X: Clone> HoverTracker<X> {
	/// Node currently under the pointer.
	pub fn current(&self) -> Option<&Node<X>> {
		self.current.as_ref()
	}

	/// Feeds the node now under the pointer and returns what to emit.
	///
	/// Staying on a node yields `Move` and none to node yields `Enter`. Any
	/// other transition yields `Leave` of the previous node; when the pointer
	/// went straight onto another node, that node becomes current without an
	/// `Enter`, so the next event over it is a `Move`.
	pub fn update(&mut self, hit: Option<&Node<X>>) -> Vec<Hover<X>> {
		match (self.current.take(), hit) {
			(None, None) => Vec::new(),
			(None, Some(node)) => {
				self.current = Some(node.clone());
				vec![Hover::Enter(node.clone())]
			}
			(Some(previous), Some(node)) if previous.id == node.id => {
				self.current = Some(node.clone());
				vec![Hover::Move(node.clone())]
			}
			(Some(previous), Some(node)) => {
				self.current = Some(node.clone());
				vec![Hover::Leave(previous)]
			}
			(Some(previous), None) => vec![Hover::Leave(previous)],
		}
	}

	/// Pointer left the surface.
	pub fn reset(&mut self) -> Option<Hover<X>> {
		self.current.take().map(Hover::Leave)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn nodes() -> Vec<Node<()>> {
		vec![
			Node::new("a", ()).with_position(0.0, 0.0),
			Node::new("b", ()).with_position(20.0, 0.0),
			Node::new("hidden", ()).with_position(40.0, 0.0).with_hidden(true),
			Node::new("unplaced", ()),
		]
	}

	#[test]
	fn hit_inside_radius_only() {
		let nodes = nodes();
		assert_eq!(hit_test(&nodes, 3.0, 3.0).map(|n| n.id.as_str()), Some("a"));
		assert_eq!(hit_test(&nodes, 22.0, -1.0).map(|n| n.id.as_str()), Some("b"));
		assert!(hit_test(&nodes, 5.0, 0.0).is_none());
		assert!(hit_test(&nodes, 10.0, 10.0).is_none());
		assert!(hit_test(&nodes, 40.0, 0.0).is_none());
	}

	#[test]
	fn enter_move_leave() {
		let nodes = nodes();
		let mut hover = HoverTracker::default();
		assert!(hover.update(None).is_empty());
		assert_eq!(hover.update(Some(&nodes[0])), vec![Hover::Enter(nodes[0].clone())]);
		assert_eq!(hover.update(Some(&nodes[0])), vec![Hover::Move(nodes[0].clone())]);
		assert_eq!(hover.update(None), vec![Hover::Leave(nodes[0].clone())]);
		assert!(hover.current().is_none());
	}

	#[test]
	fn jumping_between_nodes_leaves_then_moves() {
		let nodes = nodes();
		let mut hover = HoverTracker::default();
		hover.update(Some(&nodes[0]));
		assert_eq!(hover.update(Some(&nodes[1])), vec![Hover::Leave(nodes[0].clone())]);
		assert_eq!(hover.current().map(|n| n.id.as_str()), Some("b"));
		assert_eq!(hover.update(Some(&nodes[1])), vec![Hover::Move(nodes[1].clone())]);
		assert_eq!(hover.reset(), Some(Hover::Leave(nodes[1].clone())));
		assert_eq!(hover.reset(), None);
	}
}
