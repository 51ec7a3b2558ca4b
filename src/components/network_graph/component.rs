use std::cell::RefCell;
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::engine::NetworkGraph;
use super::snapshot::Snapshot;
use super::surface::WebSurface;
use super::types::{Edge, Node};
use crate::error::Error;

/// Graph engine as mounted in the browser.
pub type WebGraph = NetworkGraph<WebSurface, Value>;

type SharedGraph = Rc<RefCell<Option<WebGraph>>>;
type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Records to merge into the mounted graph. Re-sending known ids merges
/// them instead of duplicating.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<Node<Value>>,
	#[serde(default)]
	pub edges: Vec<Edge>,
}

/// Everything the canvas keeps alive; dropped by [`Host::teardown`].
#[derive(Default)]
struct Host {
	graph: SharedGraph,
	animate: SharedClosure,
	resize: SharedClosure,
}

impl Host {
	fn teardown(&self) {
		if let Some(mut graph) = self.graph.borrow_mut().take() {
			graph.destroy();
		}
		if let (Some(cb), Some(window)) = (self.resize.borrow_mut().take(), web_sys::window()) {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		info!("network-graph: canvas unmounted");
	}
}

/// Zero-delay timer that runs the graph's pending layout restart.
fn deferred_runner(graph: Weak<RefCell<Option<WebGraph>>>) -> Box<dyn FnMut()> {
	Box::new(move || {
		let graph = graph.clone();
		let cb = Closure::once_into_js(move || {
			if let Some(graph) = graph.upgrade() {
				if let Some(graph) = graph.borrow_mut().as_mut() {
					graph.run_scheduled();
				}
			}
		});
		if let Some(window) = web_sys::window() {
			let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), 0);
		}
	})
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Interactive network graph on a `<canvas>`.
///
/// Every change of `data` is merged into the running graph. Event callbacks
/// run synchronously inside the engine and must not call back into it.
#[component]
pub fn NetworkGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] initial: Option<Snapshot<Value>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(optional, into)] on_click_node: Option<Callback<Node<Value>>>,
	#[prop(optional, into)] on_enter_node: Option<Callback<Node<Value>>>,
	#[prop(optional, into)] on_move_node: Option<Callback<Node<Value>>>,
	#[prop(optional, into)] on_leave_node: Option<Callback<Node<Value>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let host = Host::default();
	let (graph, animate, resize) = (host.graph.clone(), host.animate.clone(), host.resize.clone());

	let mount = {
		let graph = graph.clone();
		move |canvas: HtmlCanvasElement, window: &Window| -> Result<(), Error> {
			let surface = WebSurface::new(canvas)?;
			let mut engine = match initial.clone() {
				Some(snapshot) => NetworkGraph::restore(surface, snapshot),
				None => NetworkGraph::new(surface),
			};
			engine.seed((js_sys::Math::random() * 233_280.0) as u64);
			engine.set_deferred_runner(deferred_runner(Rc::downgrade(&graph)));

			let events = engine.events();
			if let Some(cb) = on_click_node {
				events.click_node.subscribe(move |node: &Node<Value>| cb.run(node.clone()));
			}
			if let Some(cb) = on_enter_node {
				events.enter_node.subscribe(move |node: &Node<Value>| cb.run(node.clone()));
			}
			if let Some(cb) = on_move_node {
				events.move_node.subscribe(move |node: &Node<Value>| cb.run(node.clone()));
			}
			if let Some(cb) = on_leave_node {
				events.leave_node.subscribe(move |node: &Node<Value>| cb.run(node.clone()));
			}
			*graph.borrow_mut() = Some(engine);

			let graph_resize = graph.clone();
			*resize.borrow_mut() = Some(Closure::new(move || {
				if let Some(graph) = graph_resize.borrow_mut().as_mut() {
					graph.resize();
				}
			}));
			if let Some(cb) = resize.borrow().as_ref() {
				window
					.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
					.map_err(Error::from_js)?;
			}

			let (graph_anim, animate_inner) = (graph.clone(), animate.clone());
			*animate.borrow_mut() = Some(Closure::new(move || {
				match graph_anim.borrow_mut().as_mut() {
					Some(graph) => {
						graph.tick();
					}
					None => return,
				}
				if let (Some(cb), Some(window)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
					let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}));
			if let Some(cb) = animate.borrow().as_ref() {
				window
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.map_err(Error::from_js)?;
			}
			info!("network-graph: canvas mounted");
			Ok(())
		}
	};

	let graph_init = graph.clone();
	Effect::new(move |_| {
		let incoming = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if graph_init.borrow().is_none() {
			let Some(window) = web_sys::window() else {
				return;
			};
			if let Err(err) = mount(canvas.into(), &window) {
				warn!("network-graph: failed to mount canvas: {err}");
				return;
			}
		}
		if let Some(graph) = graph_init.borrow_mut().as_mut() {
			for node in incoming.nodes {
				graph.add_node(node);
			}
			for edge in incoming.edges {
				graph.add_edge(edge);
			}
		}
	});

	let host = StoredValue::new_local(host);
	on_cleanup(move || {
		host.try_with_value(Host::teardown);
	});

	let graph_md = graph.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(graph) = graph_md.borrow_mut().as_mut() {
			if graph.node_at(x, y).is_none() {
				graph.begin_pan(x, y);
			}
		}
	};

	let graph_mm = graph.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(graph) = graph_mm.borrow_mut().as_mut() {
			if !graph.pan_to(x, y) {
				graph.handle_move(x, y);
			}
		}
	};

	let graph_mu = graph.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(graph) = graph_mu.borrow_mut().as_mut() {
			graph.end_pan();
		}
	};

	let graph_click = graph.clone();
	let on_click = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(graph) = graph_click.borrow_mut().as_mut() {
			graph.handle_click(x, y);
		}
	};

	let graph_ml = graph.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(graph) = graph_ml.borrow_mut().as_mut() {
			graph.handle_leave();
		}
	};

	let graph_wh = graph;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(graph) = graph_wh.borrow_mut().as_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			graph.zoom_at(x, y, factor);
		}
	};

	let style = if fullscreen {
		"display: block; width: 100vw; height: 100vh; cursor: grab;"
	} else {
		"display: block; width: 100%; height: 100%; cursor: grab;"
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:click=on_click
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style=style
		/>
	}
}
