use serde::{Deserialize, Serialize};

/// Smallest allowed zoom factor.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed zoom factor.
pub const MAX_SCALE: f64 = 8.0;

/// Pan and zoom: `device = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
	/// Horizontal translation in device pixels.
	pub x: f64,
	/// Vertical translation in device pixels.
	pub y: f64,
	/// Scale factor.
	pub k: f64,
}

impl Default for Transform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl Transform {
	/// No pan, no zoom.
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// Builds a transform with `k` clamped to the zoom extent.
	pub fn new(x: f64, y: f64, k: f64) -> Self {
		Self { x, y, k }.clamped()
	}

	/// Same translation, scale clamped to `[MIN_SCALE, MAX_SCALE]`.
	pub fn clamped(self) -> Self {
		let k = if self.k.is_finite() {
			self.k.clamp(MIN_SCALE, MAX_SCALE)
		} else {
			1.0
		};
		Self { k, ..self }
	}

	/// Graph space to device space.
	pub fn apply(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	/// Device space to graph space.
	pub fn invert(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Shifts the translation by a device-space delta.
	pub fn translated(self, dx: f64, dy: f64) -> Self {
		Self {
			x: self.x + dx,
			y: self.y + dy,
			..self
		}
	}

	/// Scales by `factor` while keeping the graph point under `(sx, sy)` fixed.
	pub fn zoomed_at(self, sx: f64, sy: f64, factor: f64) -> Self {
		let k = (self.k * factor).clamp(MIN_SCALE, MAX_SCALE);
		let ratio = k / self.k;
		Self {
			x: sx - (sx - self.x) * ratio,
			y: sy - (sy - self.y) * ratio,
			k,
		}
	}

	/// Translation that puts graph point `(gx, gy)` at the middle of a
	/// `width` x `height` viewport, keeping the current scale.
	pub fn centered_on(self, gx: f64, gy: f64, width: f64, height: f64) -> Self {
		Self {
			x: width / 2.0 - gx * self.k,
			y: height / 2.0 - gy * self.k,
			..self
		}
	}
}

/// Tracks a background drag that pans the viewport.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Whether a drag is in progress.
	pub active: bool,
	/// Whether the drag has left the click slop.
	pub moved: bool,
	/// Device x where the drag started.
	pub start_x: f64,
	/// Device y where the drag started.
	pub start_y: f64,
	/// Viewport when the drag started.
	pub transform_start: Transform,
}

impl PanState {
	/// Device distance a drag must cover before it counts as a pan rather
	/// than a click.
	const CLICK_SLOP: f64 = 3.0;

	/// Starts a drag at device point `(x, y)` from `transform`.
	pub fn begin(&mut self, x: f64, y: f64, transform: Transform) {
		*self = Self {
			active: true,
			moved: false,
			start_x: x,
			start_y: y,
			transform_start: transform,
		};
	}

	/// Transform for the pointer at `(x, y)`, or `None` when no pan is active.
	pub fn drag_to(&mut self, x: f64, y: f64) -> Option<Transform> {
		if !self.active {
			return None;
		}
		let (dx, dy) = (x - self.start_x, y - self.start_y);
		if dx.hypot(dy) > Self::CLICK_SLOP {
			self.moved = true;
		}
		Some(self.transform_start.translated(dx, dy))
	}

	/// Ends the drag; returns whether the pointer actually moved.
	pub fn end(&mut self) -> bool {
		let moved = self.active && self.moved;
		self.active = false;
		moved
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invert_undoes_apply() {
		let t = Transform::new(12.0, -4.0, 2.5);
		let (sx, sy) = t.apply(3.0, 7.0);
		let (gx, gy) = t.invert(sx, sy);
		assert!((gx - 3.0).abs() < 1e-12);
		assert!((gy - 7.0).abs() < 1e-12);
	}

	#[test]
	fn scale_is_clamped() {
		assert_eq!(Transform::new(0.0, 0.0, 100.0).k, MAX_SCALE);
		assert_eq!(Transform::new(0.0, 0.0, 0.0).k, MIN_SCALE);
		assert_eq!(Transform::IDENTITY.zoomed_at(0.0, 0.0, 1e-6).k, MIN_SCALE);
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let t = Transform::new(10.0, 20.0, 1.0);
		let before = t.invert(100.0, 50.0);
		let after = t.zoomed_at(100.0, 50.0, 1.1).invert(100.0, 50.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn centered_on_maps_point_to_middle() {
		let t = Transform::new(0.0, 0.0, 2.0).centered_on(10.0, 5.0, 800.0, 600.0);
		assert_eq!(t.apply(10.0, 5.0), (400.0, 300.0));
	}

	#[test]
	fn short_drag_is_not_a_pan() {
		let mut pan = PanState::default();
		pan.begin(10.0, 10.0, Transform::IDENTITY);
		assert_eq!(pan.drag_to(11.0, 11.0).map(|t| t.x), Some(1.0));
		assert!(!pan.end());
		assert_eq!(pan.drag_to(50.0, 50.0), None);
	}
}
