//! User intents and the dispatcher that turns them into API calls and
//! state patches.

mod dispatcher;
mod intent;

use leptos::prelude::*;

pub use dispatcher::{Dispatcher, browser_now, local_patch};
pub use intent::{Intent, TableAction};

use crate::api::FetchTransport;

/// Copyable handle to the app's dispatcher, for use inside views.
#[derive(Clone, Copy)]
pub struct DispatchHandle(StoredValue<Dispatcher<FetchTransport>, LocalStorage>);

impl DispatchHandle {
	pub fn new(dispatcher: Dispatcher<FetchTransport>) -> Self {
		Self(StoredValue::new_local(dispatcher))
	}

	pub fn dispatch(&self, intent: Intent) {
		self.0.with_value(|d| d.spawn(intent));
	}

	/// A view callback that dispatches whatever intent `f` builds.
	pub fn callback<A: 'static>(self, f: impl Fn(A) -> Intent + Send + Sync + 'static) -> Callback<A> {
		Callback::new(move |arg| self.dispatch(f(arg)))
	}
}
