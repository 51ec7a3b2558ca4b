/// Hook the host uses to run [`crate::NetworkGraph::run_scheduled`] on a
/// later turn of its event loop.
pub type DeferredRunner = Box<dyn FnMut()>;

/// Coalesces layout restarts: at most one job is pending at a time.
#[derive(Default)]
pub struct RenderScheduler {
	in_flight: bool,
	runner: Option<DeferredRunner>,
}

impl RenderScheduler {
	/// Scheduler with nothing pending and no runner.
	pub fn new() -> Self {
		Self::default()
	}

	/// Installs the hook invoked whenever a new job is armed.
	pub fn set_runner(&mut self, runner: DeferredRunner) {
		self.runner = Some(runner);
	}

	/// Drops the hook; pending jobs must then be fired by hand.
	pub fn clear_runner(&mut self) {
		self.runner = None;
	}

	/// Arms a job. Returns `false` if one was already pending.
	pub fn request(&mut self) -> bool {
		if self.in_flight {
			return false;
		}
		self.in_flight = true;
		if let Some(runner) = self.runner.as_mut() {
			runner();
		}
		true
	}

	/// Clears the flag. Returns whether a job was pending.
	pub fn fire(&mut self) -> bool {
		std::mem::take(&mut self.in_flight)
	}

	/// Whether a job is armed but not yet fired.
	pub fn is_pending(&self) -> bool {
		self.in_flight
	}
}
