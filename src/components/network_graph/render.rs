use super::draw::{self, ImageCache};
use super::store::GraphStore;
use super::surface::Surface;
use super::viewport::Transform;

/// Zoom level above which nodes are drawn in full detail with labels.
pub const DETAIL_SCALE: f64 = 3.0;

/// Paints one frame: edges, then nodes, then labels.
pub fn render<S: Surface + ?Sized, X>(
	surface: &mut S,
	images: &mut ImageCache<S::Image>,
	store: &GraphStore<X>,
	transform: &Transform,
	(width, height): (f64, f64),
) {
	surface.save();
	surface.clear_rect(0.0, 0.0, width, height);
	surface.translate(transform.x, transform.y);
	surface.scale(transform.k);

	draw_edges(surface, store);

	let visible = || store.nodes().iter().filter(|node| !node.hidden);
	if transform.k > DETAIL_SCALE {
		for node in visible() {
			draw::draw_node(surface, images, node);
		}
		for node in visible() {
			draw::draw_label(surface, node);
		}
	} else {
		for node in visible() {
			draw::draw_summary_node(surface, node);
		}
		for node in visible().filter(|node| node.emphasize) {
			draw::draw_label(surface, node);
		}
	}
	surface.restore();
}

fn draw_edges<S: Surface + ?Sized, X>(surface: &mut S, store: &GraphStore<X>) {
	for edge in store.edges() {
		let (Some(source), Some(target)) = (store.node(&edge.source), store.node(&edge.target)) else {
			continue;
		};
		if source.hidden || target.hidden {
			continue;
		}
		let (Some(from), Some(to)) = (source.position(), target.position()) else {
			continue;
		};
		draw::draw_edge(surface, from, to, edge.direction);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::surface::{Command, RecordingSurface};
	use crate::components::network_graph::types::{Edge, Node};

	fn store() -> GraphStore<()> {
		let mut store = GraphStore::new();
		store.restore_node(Node::new("a", ()).with_label("a").with_position(0.0, 0.0));
		store.restore_node(Node::new("b", ()).with_label("b").with_position(30.0, 0.0));
		store.restore_node(Node::new("c", ()).with_label("c").with_position(0.0, 30.0).with_hidden(true));
		store.add_edge(Edge::new("a", "b"));
		store.add_edge(Edge::new("a", "c"));
		store
	}

	#[test]
	fn summary_view_hides_plain_labels() {
		let mut s = RecordingSurface::new(200.0, 100.0);
		render(&mut s, &mut ImageCache::default(), &store(), &Transform::IDENTITY, (200.0, 100.0));

		assert_eq!(s.commands.first(), Some(&Command::Save));
		assert_eq!(s.commands[1], Command::ClearRect(0.0, 0.0, 200.0, 100.0));
		assert_eq!(s.commands.last(), Some(&Command::Restore));
		assert!(s.texts().is_empty());
		let strokes = s.commands.iter().filter(|c| matches!(c, Command::Stroke(_))).count();
		assert_eq!(strokes, 1);
	}

	#[test]
	fn summary_view_labels_emphasized_nodes_only() {
		let mut store = store();
		store.restore_node(
			Node::new("hub", ())
				.with_label("hub")
				.with_emphasize(true)
				.with_position(15.0, 15.0),
		);
		store.restore_node(
			Node::new("gone", ())
				.with_label("gone")
				.with_emphasize(true)
				.with_hidden(true)
				.with_position(15.0, 30.0),
		);
		let mut s = RecordingSurface::new(200.0, 100.0);
		render(&mut s, &mut ImageCache::default(), &store, &Transform::IDENTITY, (200.0, 100.0));

		assert_eq!(s.texts(), vec!["hub"]);
		assert!(s.commands.contains(&Command::Font("5.75px sans-serif".into())));
	}

	#[test]
	fn detail_view_draws_visible_labels() {
		let mut s = RecordingSurface::new(200.0, 100.0);
		let zoomed = Transform::new(0.0, 0.0, 4.0);
		render(&mut s, &mut ImageCache::default(), &store(), &zoomed, (200.0, 100.0));

		assert!(s.commands.contains(&Command::Scale(4.0)));
		assert_eq!(s.texts(), vec!["a", "b"]);
	}

	#[test]
	fn empty_store_paints_nothing() {
		let mut s = RecordingSurface::new(200.0, 100.0);
		render(&mut s, &mut ImageCache::default(), &GraphStore::<()>::new(), &Transform::IDENTITY, (200.0, 100.0));
		assert_eq!(
			s.commands,
			vec![
				Command::Save,
				Command::ClearRect(0.0, 0.0, 200.0, 100.0),
				Command::Translate(0.0, 0.0),
				Command::Scale(1.0),
				Command::Restore,
			]
		);
	}
}
