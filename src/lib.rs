//! Incremental force-directed network graph rendered on a 2D canvas.
//!
//! The engine ([`NetworkGraph`]) is generic over its drawing [`Surface`], so
//! everything but the leptos app below also runs natively against a
//! [`RecordingSurface`].

// Modules
mod components;
mod error;

pub use components::network_graph::layout::{
	ForceSimulation, Layout, Link, Particle, SimulationConfig, SpringConfig, SpringLayout,
};
pub use components::network_graph::surface::{Command, RecordedImage, RecordingSurface, Surface};
pub use components::network_graph::*;
pub use error::Error;

#[cfg(target_arch = "wasm32")]
mod pages;

#[cfg(target_arch = "wasm32")]
pub use app::{App, init_logging, start};

#[cfg(target_arch = "wasm32")]
mod app {
	use leptos::prelude::*;
	use leptos_meta::*;
	use leptos_router::components::*;
	use leptos_router::path;
	use log::{Level, info};
	use wasm_bindgen::prelude::*;

	// Top-Level pages
	use crate::pages::home::Home;
	use crate::pages::not_found::NotFound;

	/// Initialize logging and panic hooks for the WASM target.
	pub fn init_logging() {
		let _ = console_log::init_with_level(Level::Debug);
		console_error_panic_hook::set_once();
		info!("Logging initialized");
	}

	/// An app router which renders the demo graph and handles 404's
	#[component]
	pub fn App() -> impl IntoView {
		// Provides context that manages stylesheets, titles, meta tags, etc.
		provide_meta_context();

		view! {
			<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

			// sets the document title
			<Title text="Network Graph" />

			// injects metadata in the <head> of the page
			<Meta charset="UTF-8" />
			<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

			<Router>
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Home />
				</Routes>
			</Router>
		}
	}

	#[wasm_bindgen(start)]
	pub fn start() {
		init_logging();
		leptos::mount::mount_to_body(App);
	}
}
