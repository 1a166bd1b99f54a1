//! Leptos client-side app wiring and routes.

use std::rc::Rc;
use std::time::Duration;

use leptos::ev;
use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info, warn};

// Modules
pub mod actions;
pub mod api;
pub mod components;
pub mod config;
pub mod format;
mod pages;
pub mod state;

use crate::actions::{DispatchHandle, Dispatcher, Intent};
use crate::api::{ApiClient, FetchTransport};
use crate::config::DashboardConfig;
use crate::state::{AppState, Store};

// Top-Level pages
use crate::pages::dashboard::Dashboard;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Wire config, store and dispatcher together and start the refresh timer.
fn start_dashboard() -> (RwSignal<AppState>, DispatchHandle) {
	let config = DashboardConfig::from_location();
	info!("dashboard config: {config:?}");
	let refresh_secs = config.refresh_interval_secs;

	let store = Rc::new(Store::new(AppState {
		layout_mode: config.layout_mode,
		..AppState::default()
	}));
	let state = RwSignal::new(store.get());
	if let Err(err) = store.subscribe(move |s| state.set(s.clone())) {
		warn!("could not mirror store into the view: {err}");
	}

	let api = ApiClient::new(FetchTransport::new(config.api_base.clone()));
	let dispatch = DispatchHandle::new(Dispatcher::new(api, store, config));

	if refresh_secs > 0 {
		match set_interval_with_handle(
			move || dispatch.dispatch(Intent::Refresh),
			Duration::from_secs(refresh_secs.into()),
		) {
			Ok(handle) => on_cleanup(move || handle.clear()),
			Err(err) => warn!("auto-refresh disabled: {err:?}"),
		}
	}
	dispatch.dispatch(Intent::Refresh);
	(state, dispatch)
}

/// An app router which renders the dashboard and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let (state, dispatch) = start_dashboard();
	let escape = window_event_listener(ev::keydown, move |ev| {
		if ev.key() == "Escape" {
			dispatch.dispatch(Intent::CloseRisk);
		}
	});
	on_cleanup(move || escape.remove());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Flow Ops Dashboard" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route
					path=path!("/")
					view=move || view! { <Dashboard state=state dispatch=dispatch /> }
				/>
			</Routes>
		</Router>
	}
}
