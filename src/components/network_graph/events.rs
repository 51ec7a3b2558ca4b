//! Typed publish/subscribe channels the engine emits on.

use super::types::Node;
use super::viewport::Transform;

/// Handle returned by [`Channel::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// A named channel carrying one payload type.
pub struct Channel<T> {
	name: &'static str,
	next_id: u64,
	listeners: Vec<(Subscription, Box<dyn FnMut(&T)>)>,
}

impl<T> Channel<T> {
	/// Channel without listeners.
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			next_id: 0,
			listeners: Vec::new(),
		}
	}

	/// Name used in log lines.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Attaches `listener`; it runs on every [`Channel::emit`] until unsubscribed.
	pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> Subscription {
		let subscription = Subscription(self.next_id);
		self.next_id += 1;
		self.listeners.push((subscription, Box::new(listener)));
		subscription
	}

	/// Returns whether the listener was still attached.
	pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
		let before = self.listeners.len();
		self.listeners.retain(|(s, _)| *s != subscription);
		self.listeners.len() != before
	}

	/// Calls every listener in subscription order.
	pub fn emit(&mut self, payload: &T) {
		log::trace!("network-graph: emit {}", self.name);
		for (_, listener) in &mut self.listeners {
			listener(payload);
		}
	}

	/// Number of attached listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	/// Detaches every listener.
	pub fn clear(&mut self) {
		self.listeners.clear();
	}
}

/// Every channel a [`crate::NetworkGraph`] publishes on.
pub struct GraphEvents<X> {
	/// Click on a visible node.
	pub click_node: Channel<Node<X>>,
	/// Pointer moved onto a node.
	pub enter_node: Channel<Node<X>>,
	/// Pointer moved within the hovered node.
	pub move_node: Channel<Node<X>>,
	/// Pointer left the hovered node.
	pub leave_node: Channel<Node<X>>,
	/// Fired after every viewport change, with the new transform.
	pub zoom: Channel<Transform>,
}

impl<X> Default for GraphEvents<X> {
	fn default() -> Self {
		Self {
			click_node: Channel::new("click_node"),
			enter_node: Channel::new("enter_node"),
			move_node: Channel::new("move_node"),
			leave_node: Channel::new("leave_node"),
			zoom: Channel::new("zoom"),
		}
	}
}

impl<X> GraphEvents<X> {
	/// Detaches every listener on every channel.
	pub fn clear(&mut self) {
		self.click_node.clear();
		self.enter_node.clear();
		self.move_node.clear();
		self.leave_node.clear();
		self.zoom.clear();
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;

	#[test]
	fn unsubscribed_listener_stops_receiving() {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let mut channel = Channel::new("test");
		let sink = seen.clone();
		let first = channel.subscribe(move |v: &u32| sink.borrow_mut().push(*v));
		let sink = seen.clone();
		channel.subscribe(move |v: &u32| sink.borrow_mut().push(*v * 10));

		channel.emit(&1);
		assert!(channel.unsubscribe(first));
		assert!(!channel.unsubscribe(first));
		channel.emit(&2);

		assert_eq!(*seen.borrow(), vec![1, 10, 20]);
		assert_eq!(channel.listener_count(), 1);
	}
}
