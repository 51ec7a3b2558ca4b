//! Node and edge records shared by the store, the layout and the renderer.

use serde::{Deserialize, Serialize};

/// How a node is painted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
	/// Filled disc, optionally showing a clipped avatar image.
	#[default]
	Circle,
	/// Filled square, optionally showing a clipped image.
	Square,
	/// Label pill only; collapses to a circle in the summary view.
	Text,
}

/// Which endpoint(s) of an edge carry an arrowhead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirection {
	/// Plain line.
	#[default]
	None,
	/// Arrow points at `source`.
	Source,
	/// Arrow points at `target`.
	Target,
	/// Arrows at both ends.
	Duplex,
}

impl EdgeDirection {
	/// The same arrow seen from the other endpoint.
	pub fn reversed(self) -> Self {
		match self {
			Self::Source => Self::Target,
			Self::Target => Self::Source,
			other => other,
		}
	}

	/// Direction after a second add of the same edge: conflicting or duplex
	/// arrows become [`EdgeDirection::Duplex`], everything else keeps `self`.
	pub fn merged_with(self, incoming: Self) -> Self {
		match (self, incoming) {
			(_, Self::Duplex) | (Self::Source, Self::Target) | (Self::Target, Self::Source) => {
				Self::Duplex
			}
			(current, _) => current,
		}
	}
}

/// Simulation-owned position and velocity of a node.
///
/// `x`/`y` stay `None` until a layout (or the store's spawn logic) places
/// the node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub(crate) x: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub(crate) y: Option<f64>,
	#[serde(default)]
	pub(crate) vx: f64,
	#[serde(default)]
	pub(crate) vy: f64,
}

impl Body {
	/// A body already placed at `(x, y)` and at rest.
	pub fn at(x: f64, y: f64) -> Self {
		Self {
			x: Some(x),
			y: Some(y),
			vx: 0.0,
			vy: 0.0,
		}
	}

	/// Current position, if placed.
	pub fn position(&self) -> Option<(f64, f64)> {
		Some((self.x?, self.y?))
	}

	/// Current velocity.
	pub fn velocity(&self) -> (f64, f64) {
		(self.vx, self.vy)
	}

	pub(crate) fn place(&mut self, x: f64, y: f64) {
		self.x = Some(x);
		self.y = Some(y);
	}
}

/// A graph vertex with its visual attributes and an opaque caller payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node<X = ()> {
	/// Globally unique, stable identifier.
	pub id: String,
	#[serde(default)]
	pub shape: Shape,
	#[serde(default)]
	pub font_color: Option<String>,
	#[serde(default)]
	pub bg_color: Option<String>,
	#[serde(default)]
	pub label_color: Option<String>,
	#[serde(default)]
	pub badge_color: Option<String>,
	#[serde(default)]
	pub size: Option<f64>,
	#[serde(default)]
	pub label: Option<String>,
	/// Image URL drawn inside the node once loaded.
	#[serde(default)]
	pub image: Option<String>,
	#[serde(default)]
	pub outline_width: Option<f64>,
	#[serde(default)]
	pub outline_color: Option<String>,
	/// Hidden nodes are neither drawn nor clickable, and hide their edges.
	#[serde(default)]
	pub hidden: bool,
	/// Emphasized nodes get a large label at every zoom level.
	#[serde(default)]
	pub emphasize: bool,
	/// Caller payload, carried verbatim.
	pub extra: X,
	#[serde(flatten)]
	pub(crate) body: Body,
}

impl<X> Node<X> {
	/// An unplaced circle node with default styling.
	pub fn new(id: impl Into<String>, extra: X) -> Self {
		Self {
			id: id.into(),
			shape: Shape::default(),
			font_color: None,
			bg_color: None,
			label_color: None,
			badge_color: None,
			size: None,
			label: None,
			image: None,
			outline_width: None,
			outline_color: None,
			hidden: false,
			emphasize: false,
			extra,
			body: Body::default(),
		}
	}

	/// Set shape.
	pub fn with_shape(mut self, shape: Shape) -> Self {
		self.shape = shape;
		self
	}

	/// Set label.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Set background color.
	pub fn with_bg_color(mut self, color: impl Into<String>) -> Self {
		self.bg_color = Some(color.into());
		self
	}

	/// Set image URL.
	pub fn with_image(mut self, src: impl Into<String>) -> Self {
		self.image = Some(src.into());
		self
	}

	/// Set hidden flag.
	pub fn with_hidden(mut self, hidden: bool) -> Self {
		self.hidden = hidden;
		self
	}

	/// Set emphasize flag.
	pub fn with_emphasize(mut self, emphasize: bool) -> Self {
		self.emphasize = emphasize;
		self
	}

	/// Set an initial position, bypassing spawn placement.
	pub fn with_position(mut self, x: f64, y: f64) -> Self {
		self.body.place(x, y);
		self
	}

	/// Position assigned by the layout, if any.
	pub fn position(&self) -> Option<(f64, f64)> {
		self.body.position()
	}

	/// Simulation body.
	pub fn body(&self) -> &Body {
		&self.body
	}
}

/// An edge as supplied by callers: endpoints in any order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	/// Id of one endpoint.
	pub source: String,
	/// Id of the other endpoint.
	pub target: String,
	#[serde(default)]
	pub direction: Option<EdgeDirection>,
	/// Target link length for the layout; 40 when unset.
	#[serde(default)]
	pub distance: Option<f64>,
}

impl Edge {
	/// Undirected edge between two node ids.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			direction: None,
			distance: None,
		}
	}

	/// Set direction.
	pub fn with_direction(mut self, direction: EdgeDirection) -> Self {
		self.direction = Some(direction);
		self
	}

	/// Set distance.
	pub fn with_distance(mut self, distance: f64) -> Self {
		self.distance = Some(distance);
		self
	}

	/// Reorders endpoints so `source <= target`, flipping the arrow to match.
	pub fn canonical(self) -> CanonicalEdge {
		let direction = self.direction.unwrap_or_default();
		let (source, target, direction) = if self.source > self.target {
			(self.target, self.source, direction.reversed())
		} else {
			(self.source, self.target, direction)
		};
		CanonicalEdge {
			source,
			target,
			direction,
			distance: self.distance,
		}
	}
}

/// Canonical edge id of an unordered pair.
pub fn edge_id(a: &str, b: &str) -> String {
	if a > b {
		format!("{b}|{a}")
	} else {
		format!("{a}|{b}")
	}
}

/// A stored edge: `source` is always the lexicographically smaller id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEdge {
	/// Smaller endpoint id.
	pub source: String,
	/// Larger endpoint id.
	pub target: String,
	/// Arrowheads, relative to `source` and `target`.
	pub direction: EdgeDirection,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub distance: Option<f64>,
}

impl CanonicalEdge {
	/// `"{source}|{target}"`.
	pub fn id(&self) -> String {
		format!("{}|{}", self.source, self.target)
	}
}

impl From<CanonicalEdge> for Edge {
	fn from(edge: CanonicalEdge) -> Self {
		Self {
			source: edge.source,
			target: edge.target,
			direction: Some(edge.direction),
			distance: edge.distance,
		}
	}
}
