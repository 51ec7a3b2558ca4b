use std::collections::HashSet;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use serde::{Deserialize, Serialize};

use super::{Layout, Link, Particle, place_unplaced};

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Parameters of [`SpringLayout`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
	/// Repulsion between every pair of nodes.
	pub force_charge: f32,
	/// Attraction along links.
	pub force_spring: f32,
	/// Upper bound on the force applied per tick.
	pub force_max: f32,
	/// Velocity scale.
	pub node_speed: f32,
	/// Fraction of velocity kept per tick.
	pub damping_factor: f32,
	/// Node mass.
	pub mass: f32,
	/// Time advanced per tick at full heat.
	pub frame_seconds: f32,
	/// Alpha at or above which ticks run at full speed.
	pub full_speed_alpha: f64,
	/// Ticks stop once alpha decays below this.
	pub alpha_min: f64,
}

impl Default for SpringConfig {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			mass: 10.0,
			frame_seconds: 0.016,
			full_speed_alpha: 0.1,
			alpha_min: 0.001,
		}
	}
}

impl SpringConfig {
	fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}
}

/// [`Layout`] backed by the `force_graph` spring-electrical solver.
///
/// The solver has no notion of heat, so alpha scales the time step instead.
/// Link distances are ignored.
pub struct SpringLayout {
	config: SpringConfig,
	graph: ForceGraph<usize, ()>,
	handles: Vec<Option<DefaultNodeIdx>>,
	links: Vec<Link>,
	dirty: bool,
	alpha: f64,
	center: (f64, f64),
	running: bool,
}

impl Default for SpringLayout {
	fn default() -> Self {
		Self::new(SpringConfig::default())
	}
}

impl SpringLayout {
	/// Running layout tuned by `config`.
	pub fn new(config: SpringConfig) -> Self {
		Self {
			graph: ForceGraph::new(config.parameters()),
			config,
			handles: Vec::new(),
			links: Vec::new(),
			dirty: true,
			alpha: 1.0,
			center: (0.0, 0.0),
			running: true,
		}
	}

	fn alpha_decay(&self) -> f64 {
		1.0 - self.config.alpha_min.powf(1.0 / 300.0)
	}

	fn rebuild<P: Particle>(&mut self, particles: &[P]) {
		self.graph = ForceGraph::new(self.config.parameters());
		self.handles = particles
			.iter()
			.enumerate()
			.map(|(i, particle)| {
				let (x, y) = particle.body().position()?;
				Some(self.graph.add_node(NodeData {
					x: x as f32,
					y: y as f32,
					mass: self.config.mass,
					is_anchor: false,
					user_data: i,
				}))
			})
			.collect();
		for link in &self.links {
			if link.source == link.target {
				continue;
			}
			let endpoints = (
				self.handles.get(link.source).copied().flatten(),
				self.handles.get(link.target).copied().flatten(),
			);
			if let (Some(src), Some(tgt)) = endpoints {
				self.graph.add_edge(src, tgt, EdgeData::default());
			}
		}
		self.dirty = false;
	}

	/// Moves particles sitting exactly on an earlier particle a unit away.
	/// The solver cannot push apart particles at zero distance.
	fn separate_coincident<P: Particle>(particles: &mut [P]) {
		let mut seen = HashSet::with_capacity(particles.len());
		for (i, particle) in particles.iter_mut().enumerate() {
			let body = particle.body_mut();
			let Some((mut x, mut y)) = body.position() else {
				continue;
			};
			if seen.contains(&(x.to_bits(), y.to_bits())) {
				let angle = i as f64 * GOLDEN_ANGLE;
				x += angle.cos();
				y += angle.sin();
				body.place(x, y);
			}
			seen.insert((x.to_bits(), y.to_bits()));
		}
	}

	fn recenter<P: Particle>(&self, particles: &mut [P]) {
		let placed: Vec<(f64, f64)> = particles.iter().filter_map(|p| p.body().position()).collect();
		if placed.is_empty() {
			return;
		}
		let n = placed.len() as f64;
		let cx = placed.iter().map(|p| p.0).sum::<f64>() / n;
		let cy = placed.iter().map(|p| p.1).sum::<f64>() / n;
		let (dx, dy) = (self.center.0 - cx, self.center.1 - cy);
		for particle in particles.iter_mut() {
			let body = particle.body_mut();
			if let Some((x, y)) = body.position() {
				body.place(x + dx, y + dy);
			}
		}
	}
}

impl Layout for SpringLayout {
	fn set_nodes<P: Particle>(&mut self, particles: &mut [P]) {
		place_unplaced(particles, self.center);
		Self::separate_coincident(particles);
		self.dirty = true;
	}

	fn set_links(&mut self, links: Vec<Link>) {
		self.links = links;
		self.dirty = true;
	}

	fn alpha(&self) -> f64 {
		self.alpha
	}

	fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha;
	}

	fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	fn restart(&mut self) {
		self.running = true;
	}

	fn stop(&mut self) {
		self.running = false;
	}

	fn is_running(&self) -> bool {
		self.running
	}

	fn step<P: Particle>(&mut self, particles: &mut [P]) {
		if !self.running {
			return;
		}
		self.alpha -= self.alpha * self.alpha_decay();
		if self.dirty || self.handles.len() != particles.len() {
			self.rebuild(particles);
		}

		// Positions may have been moved outside the solver since last tick.
		self.graph.visit_nodes_mut(|node| {
			if let Some((x, y)) = particles[node.data.user_data].body().position() {
				node.data.x = x as f32;
				node.data.y = y as f32;
			}
		});

		let heat = (self.alpha / self.config.full_speed_alpha).min(1.0) as f32;
		self.graph.update(self.config.frame_seconds * heat);

		self.graph.visit_nodes(|node| {
			let body = particles[node.data.user_data].body_mut();
			if let Some((x, y)) = body.position() {
				let (nx, ny) = (node.x() as f64, node.y() as f64);
				if !(nx.is_finite() && ny.is_finite()) {
					return;
				}
				body.vx = nx - x;
				body.vy = ny - y;
				body.place(nx, ny);
			}
		});
		self.recenter(particles);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::types::Body;

	#[test]
	fn places_and_moves_bodies() {
		let mut layout = SpringLayout::default();
		let mut bodies = vec![Body::at(0.0, 0.0), Body::at(1.0, 0.0), Body::default()];
		layout.set_center(0.0, 0.0);
		layout.set_nodes(&mut bodies);
		layout.set_links(vec![Link {
			source: 0,
			target: 2,
			distance: 40.0,
		}]);
		let before: Vec<_> = bodies.iter().map(|b| b.position().unwrap()).collect();
		for _ in 0..10 {
			layout.step(&mut bodies);
		}
		let after: Vec<_> = bodies.iter().map(|b| b.position().unwrap()).collect();
		assert!(after.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
		assert_ne!(before, after);
	}

	#[test]
	fn separates_stacked_bodies() {
		let mut layout = SpringLayout::default();
		let mut bodies = vec![Body::at(5.0, 5.0), Body::at(5.0, 5.0), Body::at(5.0, 5.0)];
		layout.set_nodes(&mut bodies);
		assert_eq!(bodies[0].position(), Some((5.0, 5.0)));
		assert_ne!(bodies[1].position(), bodies[0].position());
		assert_ne!(bodies[2].position(), bodies[1].position());
		for _ in 0..5 {
			layout.step(&mut bodies);
		}
		assert!(bodies.iter().all(|b| {
			let (x, y) = b.position().unwrap();
			x.is_finite() && y.is_finite()
		}));
	}

	#[test]
	fn keeps_centroid_on_center() {
		let mut layout = SpringLayout::default();
		layout.set_center(200.0, 100.0);
		let mut bodies = vec![Body::at(0.0, 0.0), Body::at(30.0, 0.0)];
		layout.step(&mut bodies);
		let (ax, ay) = bodies[0].position().unwrap();
		let (bx, by) = bodies[1].position().unwrap();
		assert!(((ax + bx) / 2.0 - 200.0).abs() < 1e-6);
		assert!(((ay + by) / 2.0 - 100.0).abs() < 1e-6);
	}
}
