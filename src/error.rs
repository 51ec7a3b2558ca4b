use thiserror::Error;

/// Failures of the setup paths around the engine. Drawing and graph
/// mutation never fail.
#[derive(Debug, Error)]
pub enum Error {
	#[error("canvas has no 2d drawing context")]
	ContextUnavailable,
	#[error("invalid snapshot: {0}")]
	Snapshot(#[from] serde_json::Error),
	#[error("javascript error: {0}")]
	Js(String),
}

#[cfg(target_arch = "wasm32")]
impl Error {
	pub(crate) fn from_js(value: wasm_bindgen::JsValue) -> Self {
		Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
