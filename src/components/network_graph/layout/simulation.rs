use serde::{Deserialize, Serialize};

use super::{Layout, Link, Particle, place_unplaced};
use crate::components::network_graph::store::SpawnRng;

/// Force constants and cooling schedule of [`ForceSimulation`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Many-body strength; negative values repel.
	pub charge_strength: f64,
	/// Pairs closer than this are treated as this far apart.
	pub distance_min: f64,
	/// Pull towards the layout center.
	pub center_strength: f64,
	/// Alpha of a freshly built simulation.
	pub alpha: f64,
	/// The simulation stops once alpha decays below this.
	pub alpha_min: f64,
	/// Alpha decays towards this value.
	pub alpha_target: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			charge_strength: -30.0,
			distance_min: 1.0,
			center_strength: 1.0,
			alpha: 1.0,
			alpha_min: 0.001,
			alpha_target: 0.0,
			velocity_decay: 0.4,
		}
	}
}

impl SimulationConfig {
	/// Per-tick decay that takes alpha from 1 to `alpha_min` in 300 ticks.
	pub fn alpha_decay(&self) -> f64 {
		1.0 - self.alpha_min.powf(1.0 / 300.0)
	}
}

/// Velocity Verlet solver with many-body repulsion, link springs and a
/// centering force.
pub struct ForceSimulation {
	config: SimulationConfig,
	alpha: f64,
	running: bool,
	center: (f64, f64),
	links: Vec<Link>,
	strengths: Vec<f64>,
	biases: Vec<f64>,
	jiggle: SpawnRng,
}

impl Default for ForceSimulation {
	fn default() -> Self {
		Self::new(SimulationConfig::default())
	}
}

impl ForceSimulation {
	/// Running simulation tuned by `config`.
	pub fn new(config: SimulationConfig) -> Self {
		Self {
			alpha: config.alpha,
			config,
			running: true,
			center: (0.0, 0.0),
			links: Vec::new(),
			strengths: Vec::new(),
			biases: Vec::new(),
			jiggle: SpawnRng::new(1),
		}
	}

	/// Current tuning.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Links from the last [`Layout::set_links`].
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	fn jiggle(&mut self) -> f64 {
		(self.jiggle.next_f64() - 0.5) * 1e-6
	}

	fn apply_charge<P: Particle>(&mut self, particles: &mut [P]) {
		let positions: Vec<Option<(f64, f64)>> =
			particles.iter().map(|p| p.body().position()).collect();
		let distance_min2 = self.config.distance_min * self.config.distance_min;
		let strength = self.config.charge_strength * self.alpha;

		for i in 0..particles.len() {
			let Some((xi, yi)) = positions[i] else {
				continue;
			};
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for (j, other) in positions.iter().enumerate() {
				let Some((xj, yj)) = *other else {
					continue;
				};
				if i == j {
					continue;
				}
				let (mut dx, mut dy) = (xj - xi, yj - yi);
				let mut l = dx * dx + dy * dy;
				if dx == 0.0 {
					dx = self.jiggle();
					l += dx * dx;
				}
				if dy == 0.0 {
					dy = self.jiggle();
					l += dy * dy;
				}
				if l < distance_min2 {
					l = (distance_min2 * l).sqrt();
				}
				let w = strength / l;
				dvx += dx * w;
				dvy += dy * w;
			}
			let body = particles[i].body_mut();
			body.vx += dvx;
			body.vy += dvy;
		}
	}

	fn apply_center<P: Particle>(&self, particles: &mut [P]) {
		let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
		for (x, y) in particles.iter().filter_map(|p| p.body().position()) {
			sx += x;
			sy += y;
			n += 1;
		}
		if n == 0 {
			return;
		}
		let shift_x = (sx / n as f64 - self.center.0) * self.config.center_strength;
		let shift_y = (sy / n as f64 - self.center.1) * self.config.center_strength;
		for particle in particles.iter_mut() {
			let body = particle.body_mut();
			if let (Some(x), Some(y)) = (body.x, body.y) {
				body.place(x - shift_x, y - shift_y);
			}
		}
	}

	fn apply_links<P: Particle>(&mut self, particles: &mut [P]) {
		for l in 0..self.links.len() {
			let Link {
				source,
				target,
				distance,
			} = self.links[l];
			if source >= particles.len() || target >= particles.len() || source == target {
				continue;
			}
			let s = *particles[source].body();
			let t = *particles[target].body();
			let (Some((sx, sy)), Some((tx, ty))) = (s.position(), t.position()) else {
				continue;
			};

			let mut dx = tx + t.vx - sx - s.vx;
			let mut dy = ty + t.vy - sy - s.vy;
			if dx == 0.0 {
				dx = self.jiggle();
			}
			if dy == 0.0 {
				dy = self.jiggle();
			}
			let len = dx.hypot(dy);
			let k = (len - distance) / len * self.alpha * self.strengths[l];
			let (dx, dy) = (dx * k, dy * k);
			let bias = self.biases[l];

			let t = particles[target].body_mut();
			t.vx -= dx * bias;
			t.vy -= dy * bias;
			let s = particles[source].body_mut();
			s.vx += dx * (1.0 - bias);
			s.vy += dy * (1.0 - bias);
		}
	}
}

impl Layout for ForceSimulation {
	fn set_nodes<P: Particle>(&mut self, particles: &mut [P]) {
		place_unplaced(particles, self.center);
	}

	fn set_links(&mut self, links: Vec<Link>) {
		let size = links
			.iter()
			.map(|l| l.source.max(l.target) + 1)
			.max()
			.unwrap_or(0);
		let mut degree = vec![0usize; size];
		for link in &links {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		self.strengths = links
			.iter()
			.map(|l| 1.0 / degree[l.source].min(degree[l.target]) as f64)
			.collect();
		self.biases = links
			.iter()
			.map(|l| degree[l.source] as f64 / (degree[l.source] + degree[l.target]) as f64)
			.collect();
		self.links = links;
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
		self.alpha += (self.config.alpha_target - self.alpha) * self.config.alpha_decay();

		self.apply_charge(particles);
		self.apply_center(particles);
		self.apply_links(particles);

		let retain = 1.0 - self.config.velocity_decay;
		for particle in particles.iter_mut() {
			let body = particle.body_mut();
			let Some((x, y)) = body.position() else {
				continue;
			};
			body.vx *= retain;
			body.vy *= retain;
			body.place(x + body.vx, y + body.vy);
		}
	}
}
