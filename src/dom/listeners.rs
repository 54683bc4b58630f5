use hashbrown::HashMap;
use tracing::{error, trace};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Event, EventTarget};

/// Event listeners attached to one target, keyed by event name.
///
/// The listeners live exactly as long as this set: they are removed from the target when it is dropped.
pub struct ListenerSet {
	target: EventTarget,
	listeners: HashMap<&'static str, Closure<dyn Fn(Event)>>,
}

impl ListenerSet {
	#[must_use]
	pub fn new(target: EventTarget) -> Self {
		Self {
			target,
			listeners: HashMap::new(),
		}
	}

	/// Listens for `event`, replacing this set's previous listener for it.
	///
	/// # Errors
	///
	/// Iff the target refused the listener.
	pub fn listen(&mut self, event: &'static str, handler: impl Fn(Event) + 'static) -> Result<(), JsValue> {
		let closure = Closure::wrap(Box::new(handler) as Box<dyn Fn(Event)>);
		self.target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
		trace!("Added {:?} listener.", event);
		if let Some(replaced) = self.listeners.insert(event, closure) {
			self.detach(event, &replaced);
		}
		Ok(())
	}

	fn detach(&self, event: &str, closure: &Closure<dyn Fn(Event)>) {
		match self.target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
			Ok(()) => trace!("Removed {:?} listener.", event),
			Err(error) => error!("Failed to remove {:?} listener: {:?}", event, error),
		}
	}
}

impl Drop for ListenerSet {
	fn drop(&mut self) {
		for (event, closure) in &self.listeners {
			self.detach(event, closure);
		}
	}
}
