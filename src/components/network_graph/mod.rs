mod draw;
mod engine;
mod events;
mod interaction;
pub mod layout;
mod render;
mod scheduler;
mod snapshot;
mod store;
pub mod surface;
mod types;
mod viewport;

#[cfg(target_arch = "wasm32")]
mod component;

#[cfg(target_arch = "wasm32")]
pub use component::{GraphData, NetworkGraphCanvas, WebGraph};
pub use draw::{
	ImageCache, RADIUS, draw_badge, draw_circle, draw_circle_image, draw_edge, draw_label,
	draw_node, draw_pill, draw_square, draw_summary_node,
};
pub use engine::{GraphConfig, NetworkGraph};
pub use events::{Channel, GraphEvents, Subscription};
pub use interaction::{Hover, HoverTracker, hit_test};
pub use render::{DETAIL_SCALE, render};
pub use scheduler::{DeferredRunner, RenderScheduler};
pub use snapshot::Snapshot;
pub use store::{Bounds, Change, GraphStore};
pub use types::{Body, CanonicalEdge, Edge, EdgeDirection, Node, Shape, edge_id};
pub use viewport::{MAX_SCALE, MIN_SCALE, PanState, Transform};
