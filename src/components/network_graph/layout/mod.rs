//! Force layout behind a narrow trait, so the engine can swap solvers.

mod simulation;
mod spring;

use std::f64::consts::PI;

pub use simulation::{ForceSimulation, SimulationConfig};
pub use spring::{SpringConfig, SpringLayout};

use super::types::{Body, Node};

/// Anything carrying a simulation [`Body`].
pub trait Particle {
	fn body(&self) -> &Body;
	fn body_mut(&mut self) -> &mut Body;
}

impl Particle for Body {
	fn body(&self) -> &Body {
		self
	}

	fn body_mut(&mut self) -> &mut Body {
		self
	}
}

impl<X> Particle for Node<X> {
	fn body(&self) -> &Body {
		&self.body
	}

	fn body_mut(&mut self) -> &mut Body {
		&mut self.body
	}
}

/// A spring between two particles, by index into the slice handed to
/// [`Layout::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	/// Index of the first endpoint.
	pub source: usize,
	/// Index of the second endpoint.
	pub target: usize,
	/// Rest length.
	pub distance: f64,
}

/// An iterative layout solver.
///
/// Particles are owned by the caller and lent to the solver for each call.
pub trait Layout {
	/// Adopts a new particle set; unplaced particles get a starting position.
	fn set_nodes<P: Particle>(&mut self, particles: &mut [P]);
	fn set_links(&mut self, links: Vec<Link>);
	fn alpha(&self) -> f64;
	fn set_alpha(&mut self, alpha: f64);
	/// Point the layout pulls the centroid toward.
	fn set_center(&mut self, x: f64, y: f64);
	/// Resumes stepping without touching positions.
	fn restart(&mut self);
	fn stop(&mut self);
	fn is_running(&self) -> bool;
	/// Advances one tick. A no-op while stopped.
	fn step<P: Particle>(&mut self, particles: &mut [P]);
}

const INITIAL_RADIUS: f64 = 10.0;

/// Places every unplaced particle on a phyllotaxis spiral around `center`.
pub(crate) fn place_unplaced<P: Particle>(particles: &mut [P], center: (f64, f64)) {
	let angle_step = PI * (3.0 - 5f64.sqrt());
	for (i, particle) in particles.iter_mut().enumerate() {
		let body = particle.body_mut();
		if body.position().is_some() {
			continue;
		}
		let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
		let angle = i as f64 * angle_step;
		body.place(center.0 + radius * angle.cos(), center.1 + radius * angle.sin());
		body.vx = 0.0;
		body.vy = 0.0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn placement_spreads_unplaced_only() {
		let mut bodies = vec![Body::default(), Body::at(500.0, 500.0), Body::default()];
		place_unplaced(&mut bodies, (100.0, 50.0));

		assert_eq!(bodies[1].position(), Some((500.0, 500.0)));
		let a = bodies[0].position().unwrap();
		let c = bodies[2].position().unwrap();
		assert!(a.0.is_finite() && a.1.is_finite());
		assert_ne!(a, c);
		assert!(((c.0 - 100.0).hypot(c.1 - 50.0) - INITIAL_RADIUS * 2.5f64.sqrt()).abs() < 1e-9);
	}
}
