//! The single application state object and its observable store.

mod app;
mod store;

pub use app::{AppState, Health, Panel, StatePatch, Toast, ToastKind};
pub use store::{StateError, Store, SubscriptionId};
