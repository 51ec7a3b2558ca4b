use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::types::{Edge, Node};
use super::viewport::Transform;
use crate::error::Error;

/// Everything needed to rebuild a running graph: the output of
/// [`crate::NetworkGraph::dump`] and the input of
/// [`crate::NetworkGraph::restore`]. Every field may be omitted on input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "X: Deserialize<'de>"))]
pub struct Snapshot<X> {
	/// Nodes verbatim, including live positions.
	#[serde(default)]
	pub nodes: Vec<Node<X>>,
	/// Edges by endpoint id; canonicalized again on restore.
	#[serde(default)]
	pub edges: Vec<Edge>,
	#[serde(default)]
	pub transform: Option<Transform>,
	#[serde(default)]
	pub simulator_alpha: Option<f64>,
}

impl<X> Default for Snapshot<X> {
	fn default() -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			transform: None,
			simulator_alpha: None,
		}
	}
}

impl<X: Serialize> Snapshot<X> {
	/// Serializes to JSON with camelCase keys.
	pub fn to_json(&self) -> Result<String, Error> {
		Ok(serde_json::to_string(self)?)
	}
}

impl<X: DeserializeOwned> Snapshot<X> {
	/// Parses the output of [`Snapshot::to_json`].
	pub fn from_json(json: &str) -> Result<Self, Error> {
		Ok(serde_json::from_str(json)?)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::{Value, json};

	use super::*;
	use crate::components::network_graph::types::EdgeDirection;

	#[test]
	fn partial_input_is_accepted() {
		let snapshot: Snapshot<Value> = Snapshot::from_json(
			r#"{"nodes":[{"id":"octocat","extra":{"login":"octocat"},"x":3.0,"y":4.0}]}"#,
		)
		.unwrap();
		assert_eq!(snapshot.nodes.len(), 1);
		assert_eq!(snapshot.nodes[0].position(), Some((3.0, 4.0)));
		assert_eq!(snapshot.nodes[0].extra, json!({"login": "octocat"}));
		assert!(snapshot.edges.is_empty());
		assert_eq!(snapshot.transform, None);
	}

	#[test]
	fn json_keeps_direction_and_transform() {
		let snapshot = Snapshot::<()> {
			nodes: vec![Node::new("a", ())],
			edges: vec![Edge::new("a", "b").with_direction(EdgeDirection::Duplex)],
			transform: Some(Transform::new(1.0, 2.0, 3.0)),
			simulator_alpha: Some(0.25),
		};
		let back = Snapshot::<()>::from_json(&snapshot.to_json().unwrap()).unwrap();
		assert_eq!(back, snapshot);
	}

	#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
	struct Account {
		login: String,
		followers: u32,
	}

	#[test]
	fn payloads_need_no_default() {
		let snapshot: Snapshot<Account> = Snapshot::from_json(
			r#"{"nodes":[{"id":"u1","extra":{"login":"octocat","followers":7}}],"simulatorAlpha":0.5}"#,
		)
		.unwrap();
		assert_eq!(
			snapshot.nodes[0].extra,
			Account {
				login: "octocat".into(),
				followers: 7,
			}
		);
		assert_eq!(snapshot.simulator_alpha, Some(0.5));
		assert_eq!(snapshot.nodes[0].position(), None);
	}

	#[test]
	fn malformed_json_is_an_error() {
		assert!(matches!(
			Snapshot::<()>::from_json("{"),
			Err(Error::Snapshot(_))
		));
	}
}
