use std::cell::{Cell, RefCell};

use log::warn;
use thiserror::Error;

use super::app::{AppState, StatePatch};

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateError {
	/// A mutation was attempted while subscribers were being notified.
	#[error("state mutation rejected: subscribers are still being notified")]
	Reentrant,
}

/// Handle returned by [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&AppState)>;

/// Observable container for the single [`AppState`].
///
/// [`Store::set`] is the only way to change the state. It merges the patch
/// and synchronously notifies every subscriber before returning.
pub struct Store {
	state: RefCell<AppState>,
	subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
	notifying: Cell<bool>,
	next_id: Cell<u64>,
}

impl Store {
	pub fn new(initial: AppState) -> Self {
		Self {
			state: RefCell::new(initial),
			subscribers: RefCell::new(Vec::new()),
			notifying: Cell::new(false),
			next_id: Cell::new(0),
		}
	}

	/// Clone of the current state.
	pub fn get(&self) -> AppState {
		self.state.borrow().clone()
	}

	pub fn with<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
		f(&self.state.borrow())
	}

	pub fn set(&self, patch: StatePatch) -> Result<(), StateError> {
		if self.notifying.get() {
			warn!("rejecting state patch issued during notification");
			return Err(StateError::Reentrant);
		}
		patch.merge_into(&mut self.state.borrow_mut());

		self.notifying.set(true);
		{
			let state = self.state.borrow();
			for (_, subscriber) in self.subscribers.borrow().iter() {
				subscriber(&state);
			}
		}
		self.notifying.set(false);
		Ok(())
	}

	/// Register a subscriber. It is not called until the next [`Store::set`].
	pub fn subscribe(&self, f: impl Fn(&AppState) + 'static) -> Result<SubscriptionId, StateError> {
		if self.notifying.get() {
			return Err(StateError::Reentrant);
		}
		let id = SubscriptionId(self.next_id.get());
		self.next_id.set(id.0 + 1);
		self.subscribers.borrow_mut().push((id, Box::new(f)));
		Ok(id)
	}

	pub fn unsubscribe(&self, id: SubscriptionId) -> Result<(), StateError> {
		if self.notifying.get() {
			return Err(StateError::Reentrant);
		}
		self.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
		Ok(())
	}
}

impl Default for Store {
	fn default() -> Self {
		Self::new(AppState::default())
	}
}
