//! Stateless drawing primitives. All coordinates are in graph space; the
//! caller has already applied the viewport transform to the surface.

use std::collections::HashMap;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI};

use super::surface::Surface;
use super::types::{EdgeDirection, Node, Shape};

/// Radius of every node, in graph units. Also the hit-test radius.
pub const RADIUS: f64 = 5.0;

const EDGE_COLOR: &str = "#3d62c4";
const EDGE_WIDTH: f64 = 0.125;
const ARROWHEAD_H: f64 = 2.0;
const ARROWHEAD_W: f64 = 0.75;

const DEFAULT_BG_COLOR: &str = "#CCCCCC";
const DEFAULT_FONT_COLOR: &str = "#35425F";
const DEFAULT_LABEL_COLOR: &str = "#623CEA";
const TEXT_NODE_COLOR: &str = "#333333";
const WHITE: &str = "#FFFFFF";

const LABEL_FONT: &str = "1.75px sans-serif";
const EMPHASIS_FONT: &str = "5.75px sans-serif";
const PILL_RADIUS: f64 = 1.5;
const LABEL_OFFSET: f64 = RADIUS + 2.0;

const BADGE_RING_RADIUS: f64 = 1.125;
const BADGE_RADIUS: f64 = 0.875;

/// Images by source URL, loaded lazily through the surface.
pub struct ImageCache<I> {
	images: HashMap<String, I>,
}

impl<I> Default for ImageCache<I> {
	fn default() -> Self {
		Self {
			images: HashMap::new(),
		}
	}
}

impl<I> ImageCache<I> {
	/// The decoded image for `src` and its natural size, starting the load on
	/// first use. `None` until the surface reports it decoded.
	pub fn ready<'a, S>(&'a mut self, surface: &mut S, src: &str) -> Option<(&'a I, (f64, f64))>
	where
		S: Surface<Image = I> + ?Sized,
	{
		if !self.images.contains_key(src) {
			let image = surface.load_image(src)?;
			self.images.insert(src.to_owned(), image);
		}
		let image = self.images.get(src)?;
		let size = surface.image_size(image)?;
		Some((image, size))
	}

	/// Number of cached images.
	pub fn len(&self) -> usize {
		self.images.len()
	}

	/// Whether nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.images.is_empty()
	}

	/// Forgets every cached image.
	pub fn clear(&mut self) {
		self.images.clear();
	}
}

/// Filled disc of radius `r` centered on `(x, y)`.
pub fn draw_circle<S: Surface + ?Sized>(s: &mut S, x: f64, y: f64, r: f64, color: &str) {
	s.begin_path();
	s.arc(x, y, r, 0.0, 2.0 * PI, true);
	s.set_fill_style(color);
	s.fill();
}

/// Filled square of half-side `r` centered on `(x, y)`.
pub fn draw_square<S: Surface + ?Sized>(s: &mut S, x: f64, y: f64, r: f64, color: &str) {
	s.begin_path();
	s.rect(x - r, y - r, 2.0 * r, 2.0 * r);
	s.set_fill_style(color);
	s.fill();
}

/// Draws the centered square crop of `image` into the current clip.
fn draw_cropped<S: Surface + ?Sized>(
	s: &mut S,
	image: &S::Image,
	(width, height): (f64, f64),
	x: f64,
	y: f64,
	r: f64,
) {
	let side = width.min(height);
	s.draw_image(
		image,
		(width - side) / 2.0,
		(height - side) / 2.0,
		side,
		side,
		x - r,
		y - r,
		r * 2.0,
		r * 2.0,
	);
}

/// `image` clipped to a disc.
pub fn draw_circle_image<S: Surface + ?Sized>(
	s: &mut S,
	x: f64,
	y: f64,
	r: f64,
	image: &S::Image,
	size: (f64, f64),
) {
	s.save();
	s.begin_path();
	s.arc(x, y, r, 0.0, 2.0 * PI, true);
	s.clip();
	draw_cropped(s, image, size, x, y, r);
	s.restore();
}

/// Small white-ringed dot at the node's upper right.
pub fn draw_badge<S: Surface + ?Sized>(s: &mut S, x: f64, y: f64, r: f64, color: &str) {
	let (bx, by) = (x + r * FRAC_1_SQRT_2, y - r * FRAC_1_SQRT_2);
	draw_circle(s, bx, by, BADGE_RING_RADIUS, WHITE);
	draw_circle(s, bx, by, BADGE_RADIUS, color);
}

/// Rounded pill sized to `text`, centered on `(x, y)`, with white text.
pub fn draw_pill<S: Surface + ?Sized>(s: &mut S, x: f64, y: f64, text: &str, color: &str) {
	s.save();
	s.set_font(LABEL_FONT);
	s.center_text();
	let half = s.measure_text(text) / 2.0;

	s.begin_path();
	s.move_to(x - half, y - PILL_RADIUS);
	s.line_to(x + half, y - PILL_RADIUS);
	s.arc(x + half, y, PILL_RADIUS, -FRAC_PI_2, FRAC_PI_2, false);
	s.line_to(x + half, y + PILL_RADIUS);
	s.line_to(x - half, y + PILL_RADIUS);
	s.arc(x - half, y, PILL_RADIUS, FRAC_PI_2, -FRAC_PI_2, false);
	s.set_fill_style(color);
	s.fill();

	s.set_fill_style(WHITE);
	s.fill_text(text, x, y);
	s.restore();
}

fn draw_line<S: Surface + ?Sized>(s: &mut S, from: (f64, f64), to: (f64, f64)) {
	s.begin_path();
	s.move_to(from.0, from.1);
	s.line_to(to.0, to.1);
	s.set_line_width(EDGE_WIDTH);
	s.set_stroke_style(EDGE_COLOR);
	s.stroke();
}

/// Triangle whose tip touches the disc around `(nx, ny)`; `(dx, dy)` is the
/// unit vector from the node into the edge.
fn draw_arrowhead<S: Surface + ?Sized>(s: &mut S, (nx, ny): (f64, f64), (dx, dy): (f64, f64)) {
	let (bx, by) = (nx + (RADIUS + ARROWHEAD_H) * dx, ny + (RADIUS + ARROWHEAD_H) * dy);
	let (px, py) = (-dy * ARROWHEAD_W / 2.0, dx * ARROWHEAD_W / 2.0);
	s.begin_path();
	s.move_to(nx + RADIUS * dx, ny + RADIUS * dy);
	s.line_to(bx + px, by + py);
	s.line_to(bx - px, by - py);
	s.set_fill_style(EDGE_COLOR);
	s.fill();
}

/// Line between two node centers, with arrowheads per `direction`.
pub fn draw_edge<S: Surface + ?Sized>(
	s: &mut S,
	(x1, y1): (f64, f64),
	(x2, y2): (f64, f64),
	direction: EdgeDirection,
) {
	if direction == EdgeDirection::None {
		draw_line(s, (x1, y1), (x2, y2));
		return;
	}
	let len = (x2 - x1).hypot(y2 - y1);
	if len <= f64::EPSILON {
		return;
	}
	let (cos, sin) = ((x2 - x1) / len, (y2 - y1) / len);
	let inset = RADIUS + ARROWHEAD_H / 2.0;
	let at_source = (x1 + inset * cos, y1 + inset * sin);
	let at_target = (x2 - inset * cos, y2 - inset * sin);

	match direction {
		EdgeDirection::Duplex => {
			draw_line(s, at_source, at_target);
			draw_arrowhead(s, (x1, y1), (cos, sin));
			draw_arrowhead(s, (x2, y2), (-cos, -sin));
		}
		EdgeDirection::Target => {
			draw_line(s, (x1, y1), at_target);
			draw_arrowhead(s, (x2, y2), (-cos, -sin));
		}
		EdgeDirection::Source => {
			draw_line(s, at_source, (x2, y2));
			draw_arrowhead(s, (x1, y1), (cos, sin));
		}
		EdgeDirection::None => {}
	}
}

fn draw_outline<X, S: Surface + ?Sized>(s: &mut S, node: &Node<X>, x: f64, y: f64) {
	let (Some(width), Some(color)) = (node.outline_width, node.outline_color.as_deref()) else {
		return;
	};
	if width <= 0.0 {
		return;
	}
	match node.shape {
		Shape::Square => draw_square(s, x, y, RADIUS + width, color),
		Shape::Circle | Shape::Text => draw_circle(s, x, y, RADIUS + width, color),
	}
}

fn bg_color<X>(node: &Node<X>) -> &str {
	node.bg_color.as_deref().unwrap_or(DEFAULT_BG_COLOR)
}

/// Full-detail node: image, outline, badge, or the text pill.
pub fn draw_node<X, S: Surface + ?Sized>(s: &mut S, images: &mut ImageCache<S::Image>, node: &Node<X>) {
	let Some((x, y)) = node.position() else {
		return;
	};
	match node.shape {
		Shape::Square => {
			draw_outline(s, node, x, y);
			s.save();
			s.begin_path();
			s.rect(x - RADIUS, y - RADIUS, RADIUS * 2.0, RADIUS * 2.0);
			match node.image.as_deref().and_then(|src| images.ready(s, src)) {
				Some((image, size)) => {
					s.clip();
					draw_cropped(s, image, size, x, y, RADIUS);
				}
				None => {
					s.set_fill_style(bg_color(node));
					s.fill();
				}
			}
			s.restore();
		}
		Shape::Circle => {
			draw_outline(s, node, x, y);
			match node.image.as_deref().and_then(|src| images.ready(s, src)) {
				Some((image, size)) => draw_circle_image(s, x, y, RADIUS, image, size),
				None => draw_circle(s, x, y, RADIUS, bg_color(node)),
			}
			if let Some(badge) = node.badge_color.as_deref() {
				draw_badge(s, x, y, RADIUS, badge);
			}
		}
		Shape::Text => {
			if let Some(label) = node.label.as_deref() {
				draw_pill(s, x, y, label, TEXT_NODE_COLOR);
			}
		}
	}
}

/// Flat node for zoomed-out views. Text nodes collapse to circles.
pub fn draw_summary_node<X, S: Surface + ?Sized>(s: &mut S, node: &Node<X>) {
	let Some((x, y)) = node.position() else {
		return;
	};
	draw_outline(s, node, x, y);
	match node.shape {
		Shape::Square => draw_square(s, x, y, RADIUS, bg_color(node)),
		Shape::Circle | Shape::Text => {
			draw_circle(s, x, y, RADIUS, bg_color(node));
			if let Some(badge) = node.badge_color.as_deref() {
				draw_badge(s, x, y, RADIUS, badge);
			}
		}
	}
}

/// Large bare label for emphasized nodes, otherwise a pill under the node.
/// Text nodes already show their label.
pub fn draw_label<X, S: Surface + ?Sized>(s: &mut S, node: &Node<X>) {
	let Some(label) = node.label.as_deref() else {
		return;
	};
	let Some((x, y)) = node.position() else {
		return;
	};
	if node.emphasize {
		s.set_fill_style(node.font_color.as_deref().unwrap_or(DEFAULT_FONT_COLOR));
		s.set_font(EMPHASIS_FONT);
		s.center_text();
		s.fill_text(label, x, y);
		return;
	}
	if node.shape == Shape::Text {
		return;
	}
	let color = node.label_color.as_deref().unwrap_or(DEFAULT_LABEL_COLOR);
	draw_pill(s, x, y + LABEL_OFFSET, label, color);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::surface::{Command, RecordingSurface};

	#[test]
	fn plain_edge_is_one_stroke() {
		let mut s = RecordingSurface::new(100.0, 100.0);
		draw_edge(&mut s, (0.0, 0.0), (20.0, 0.0), EdgeDirection::None);
		assert_eq!(s.fills_with(EDGE_COLOR), 0);
		assert!(s.commands.contains(&Command::MoveTo(0.0, 0.0)));
		assert!(s.commands.contains(&Command::LineTo(20.0, 0.0)));
	}

	#[test]
	fn target_arrow_touches_target_disc() {
		let mut s = RecordingSurface::new(100.0, 100.0);
		draw_edge(&mut s, (0.0, 0.0), (20.0, 0.0), EdgeDirection::Target);
		assert_eq!(s.fills_with(EDGE_COLOR), 1);
		assert!(s.commands.contains(&Command::LineTo(20.0 - RADIUS - ARROWHEAD_H / 2.0, 0.0)));
		assert!(s.commands.contains(&Command::MoveTo(20.0 - RADIUS, 0.0)));
	}

	#[test]
	fn duplex_has_two_arrows() {
		let mut s = RecordingSurface::new(100.0, 100.0);
		draw_edge(&mut s, (0.0, 0.0), (0.0, 30.0), EdgeDirection::Duplex);
		assert_eq!(s.fills_with(EDGE_COLOR), 2);
		assert!(s.commands.contains(&Command::MoveTo(0.0, RADIUS)));
		assert!(s.commands.contains(&Command::MoveTo(0.0, 30.0 - RADIUS)));
	}

	#[test]
	fn coincident_directed_edge_draws_nothing() {
		let mut s = RecordingSurface::new(100.0, 100.0);
		draw_edge(&mut s, (3.0, 3.0), (3.0, 3.0), EdgeDirection::Source);
		assert!(s.commands.is_empty());
	}

	#[test]
	fn image_falls_back_until_loaded() {
		let mut s = RecordingSurface::new(100.0, 100.0);
		let mut images = ImageCache::default();
		let node = Node::new("a", ())
			.with_image("avatar.png")
			.with_bg_color("#123456")
			.with_position(10.0, 10.0);

		draw_node(&mut s, &mut images, &node);
		assert_eq!(s.fills_with("#123456"), 1);
		assert_eq!(s.requested_images, vec!["avatar.png"]);

		s.mark_loaded("avatar.png", 40.0, 20.0);
		s.take_commands();
		draw_node(&mut s, &mut images, &node);
		assert_eq!(s.fills_with("#123456"), 0);
		assert!(s.commands.contains(&Command::Image {
			src: "avatar.png".into(),
			dx: 5.0,
			dy: 5.0,
			dw: 10.0,
			dh: 10.0,
		}));
		assert_eq!(s.requested_images.len(), 1);
	}

	#[test]
	fn badge_sits_upper_right() {
		let mut s = RecordingSurface::new(100.0, 100.0);
		let mut node = Node::new("a", ()).with_position(0.0, 0.0);
		node.badge_color = Some("#00ff00".into());
		draw_summary_node(&mut s, &node);
		let badge = s.commands.iter().find_map(|c| match c {
			Command::Arc { x, y, r } if *r == BADGE_RADIUS => Some((*x, *y)),
			_ => None,
		});
		let (bx, by) = badge.unwrap();
		assert!(bx > 0.0 && by < 0.0);
	}

	#[test]
	fn labels_follow_emphasis_and_shape() {
		let mut s = RecordingSurface::new(100.0, 100.0);
		let plain = Node::new("a", ()).with_label("octocat").with_position(0.0, 0.0);
		draw_label(&mut s, &plain);
		assert!(s.commands.contains(&Command::Text {
			text: "octocat".into(),
			x: 0.0,
			y: LABEL_OFFSET,
		}));
		assert_eq!(s.fills_with(DEFAULT_LABEL_COLOR), 1);

		s.take_commands();
		draw_label(&mut s, &plain.clone().with_emphasize(true));
		assert!(s.commands.contains(&Command::Font(EMPHASIS_FONT.into())));

		s.take_commands();
		draw_label(&mut s, &plain.with_shape(Shape::Text));
		assert!(s.commands.is_empty());
	}

	#[test]
	fn square_node_outlines_then_fills() {
		let mut s = RecordingSurface::new(100.0, 100.0);
		let mut images = ImageCache::default();
		let mut node = Node::new("repo", ())
			.with_shape(Shape::Square)
			.with_bg_color("#abcdef")
			.with_position(10.0, 10.0);
		node.outline_width = Some(1.0);
		node.outline_color = Some("#ff0000".into());

		draw_node(&mut s, &mut images, &node);
		assert_eq!(s.fills_with("#ff0000"), 1);
		assert_eq!(s.fills_with("#abcdef"), 1);
		assert!(s.commands.contains(&Command::Rect(4.0, 4.0, 12.0, 12.0)));
		assert!(s.commands.contains(&Command::Rect(5.0, 5.0, 10.0, 10.0)));
		assert!(!s.commands.contains(&Command::Clip));
		assert!(!s.commands.iter().any(|c| matches!(c, Command::Arc { .. })));
	}

	#[test]
	fn square_image_is_clipped_to_the_square() {
		let mut s = RecordingSurface::new(100.0, 100.0);
		let mut images = ImageCache::default();
		let node = Node::new("repo", ())
			.with_shape(Shape::Square)
			.with_bg_color("#abcdef")
			.with_image("logo.png")
			.with_position(10.0, 10.0);
		s.mark_loaded("logo.png", 30.0, 60.0);

		draw_node(&mut s, &mut images, &node);
		assert_eq!(s.fills_with("#abcdef"), 0);
		let clip = s.commands.iter().position(|c| *c == Command::Clip).unwrap();
		let image = s
			.commands
			.iter()
			.position(|c| {
				*c == Command::Image {
					src: "logo.png".into(),
					dx: 5.0,
					dy: 5.0,
					dw: 10.0,
					dh: 10.0,
				}
			})
			.unwrap();
		assert!(clip < image);
		assert_eq!(s.commands[clip - 1], Command::Rect(5.0, 5.0, 10.0, 10.0));
		assert_eq!(s.commands.last(), Some(&Command::Restore));
	}

	#[test]
	fn text_node_is_a_pill_in_detail_and_a_disc_in_summary() {
		let mut s = RecordingSurface::new(100.0, 100.0);
		let mut images = ImageCache::default();
		let node = Node::new("topic", ())
			.with_shape(Shape::Text)
			.with_label("rust")
			.with_position(0.0, 0.0);

		draw_node(&mut s, &mut images, &node);
		assert_eq!(s.fills_with(TEXT_NODE_COLOR), 1);
		assert!(s.commands.contains(&Command::Text {
			text: "rust".into(),
			x: 0.0,
			y: 0.0,
		}));
		assert!(!s.commands.iter().any(|c| matches!(c, Command::Arc { r, .. } if *r == RADIUS)));

		s.take_commands();
		draw_summary_node(&mut s, &node);
		assert!(s.texts().is_empty());
		assert_eq!(s.fills_with(DEFAULT_BG_COLOR), 1);
		assert!(s.commands.contains(&Command::Arc { x: 0.0, y: 0.0, r: RADIUS }));

		s.take_commands();
		draw_node(&mut s, &mut images, &Node::new("bare", ()).with_shape(Shape::Text).with_position(0.0, 0.0));
		assert!(s.commands.is_empty());
	}

	#[test]
	fn unplaced_node_is_skipped() {
		let mut s = RecordingSurface::new(100.0, 100.0);
		let mut images = ImageCache::default();
		let node = Node::new("a", ()).with_label("x");
		draw_node(&mut s, &mut images, &node);
		draw_summary_node(&mut s, &node);
		draw_label(&mut s, &node);
		assert!(s.commands.is_empty());
	}
}
