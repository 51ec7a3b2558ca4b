use leptos::prelude::*;
use serde_json::{Value, json};

use crate::components::network_graph::{
	Edge, EdgeDirection, GraphData, NetworkGraphCanvas, Node, Shape,
};

const USERS_PER_BATCH: usize = 12;

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// One page of a follower graph: users follow earlier users and star a
/// handful of repositories, each tagged with a topic.
fn follower_batch(batch: usize) -> GraphData {
	let mut data = GraphData::default();
	let first = batch * USERS_PER_BATCH;

	if batch == 0 {
		for topic in ["rust", "wasm", "graphs"] {
			data.nodes.push(
				Node::new(format!("topic:{topic}"), json!({ "kind": "topic" }))
					.with_shape(Shape::Text)
					.with_label(format!("#{topic}")),
			);
		}
		for (i, repo) in ["canvas", "layout", "router"].iter().enumerate() {
			let id = format!("repo:{repo}");
			data.nodes.push(
				Node::new(&id, json!({ "kind": "repo", "stars": 0 }))
					.with_shape(Shape::Square)
					.with_bg_color("#2f9e44")
					.with_label(*repo)
					.with_emphasize(true),
			);
			let topic = ["rust", "wasm", "graphs"][i];
			data.edges.push(Edge::new(&id, format!("topic:{topic}")));
		}
	}

	for i in first..first + USERS_PER_BATCH {
		let id = format!("user:{i}");
		let mut node = Node::new(&id, json!({ "kind": "user", "login": format!("dev{i}") }));
		if i % 5 == 0 {
			node = node.with_label(format!("dev{i}"));
		}
		data.nodes.push(node);

		if i > 0 {
			let followed = (rand_simple(i) * i as f64) as usize;
			let direction = if rand_simple(i + 7) < 0.2 {
				EdgeDirection::Duplex
			} else {
				EdgeDirection::Target
			};
			data.edges
				.push(Edge::new(&id, format!("user:{followed}")).with_direction(direction));
		}

		let repo = ["canvas", "layout", "router"][(rand_simple(i * 3) * 3.0) as usize % 3];
		data.edges.push(
			Edge::new(&id, format!("repo:{repo}"))
				.with_direction(EdgeDirection::Target)
				.with_distance(60.0),
		);
	}
	data
}

fn describe(node: &Node<Value>) -> String {
	let kind = node.extra.get("kind").and_then(Value::as_str).unwrap_or("node");
	format!("{kind}: {}", node.label.as_deref().unwrap_or(&node.id))
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (batch, set_batch) = signal(0usize);
	let graph_data = Signal::derive(move || follower_batch(batch.get()));
	let (selected, set_selected) = signal(None::<String>);
	let (hovered, set_hovered) = signal(None::<String>);

	let on_click_node = Callback::new(move |node: Node<Value>| set_selected.set(Some(describe(&node))));
	let on_enter_node = Callback::new(move |node: Node<Value>| set_hovered.set(Some(describe(&node))));
	let on_move_node = Callback::new(move |node: Node<Value>| set_hovered.set(Some(describe(&node))));
	let on_leave_node = Callback::new(move |_: Node<Value>| set_hovered.set(None));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<NetworkGraphCanvas
					data=graph_data
					fullscreen=true
					on_click_node=on_click_node
					on_enter_node=on_enter_node
					on_move_node=on_move_node
					on_leave_node=on_leave_node
				/>
				<div class="graph-overlay">
					<h1>"Network Graph"</h1>
					<p class="subtitle">"Scroll to zoom. Drag background to pan. Click a node to select it."</p>
					<button on:click=move |_| set_batch.update(|b| *b += 1)>"Load more followers"</button>
					<p>{move || hovered.get().unwrap_or_default()}</p>
					<p>{move || selected.get().map(|s| format!("Selected {s}")).unwrap_or_default()}</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
