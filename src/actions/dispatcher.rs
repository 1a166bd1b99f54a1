use std::rc::Rc;

use leptos::task::spawn_local;
use log::{debug, info, warn};

use super::intent::Intent;
use crate::api::{ApiClient, ApiError, Result, Transport};
use crate::components::force_graph::GraphView;
use crate::components::force_graph::scale::{clamp_zoom, zoom_in, zoom_out};
use crate::config::DashboardConfig;
use crate::format::{truncate, value_or_na};
use crate::state::{AppState, Health, Panel, StatePatch, Store, ToastKind};

/// Longest error text shown next to the health dot.
const HEALTH_MESSAGE_LEN: usize = 120;
/// Longest error text shown in a toast.
const TOAST_MESSAGE_LEN: usize = 140;
const BUSY_MESSAGE: &str = "Still working on the previous action; try again shortly";

/// ISO timestamp from the browser clock.
pub fn browser_now() -> String {
	js_sys::Date::new_0().to_iso_string().into()
}

/// The state patch for a local intent, or `None` when there is nothing to change.
pub fn local_patch(state: &AppState, intent: &Intent) -> Option<StatePatch> {
	let view = state.graph_view;
	let patch = match intent {
		Intent::Navigate(panel) => StatePatch {
			active_panel: Some(*panel),
			..StatePatch::default()
		},
		Intent::ApplyGraphFilters { min_tx, direction } => StatePatch {
			graph_view: Some(GraphView {
				min_tx: (*min_tx).max(0) as u64,
				direction: *direction,
				..view
			}),
			..StatePatch::default()
		},
		Intent::ZoomIn | Intent::ZoomOut | Intent::SetZoom(_) => {
			let scale = match intent {
				Intent::ZoomIn => zoom_in(view.scale),
				Intent::ZoomOut => zoom_out(view.scale),
				Intent::SetZoom(k) => clamp_zoom(*k),
				_ => view.scale,
			};
			if scale == view.scale {
				return None;
			}
			StatePatch {
				graph_view: Some(GraphView { scale, ..view }),
				..StatePatch::default()
			}
		}
		Intent::ResetGraphView => StatePatch {
			graph_view: Some(GraphView::default()),
			view_epoch: Some(state.view_epoch + 1),
			..StatePatch::default()
		},
		Intent::SetLayoutMode(mode) => StatePatch {
			layout_mode: Some(*mode),
			..StatePatch::default()
		},
		Intent::CloseRisk => {
			state.risk.as_ref()?;
			StatePatch {
				risk: Some(None),
				..StatePatch::default()
			}
		}
		Intent::DismissToast(id) => StatePatch {
			toasts: Some(state.toasts.iter().filter(|t| t.id != *id).cloned().collect()),
			..StatePatch::default()
		},
		_ => return None,
	};
	Some(patch)
}

struct Inner<T> {
	api: ApiClient<T>,
	store: Rc<Store>,
	config: DashboardConfig,
	clock: fn() -> String,
}

/// Runs intents against the API and folds their results into the [`Store`].
///
/// Every remote intent goes through one guard that raises the global busy
/// flag for its duration and turns any error into a degraded health state
/// and an error toast. Prior state is left in place on failure.
pub struct Dispatcher<T> {
	inner: Rc<Inner<T>>,
}

impl<T> Clone for Dispatcher<T> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T: Transport + 'static> Dispatcher<T> {
	pub fn new(api: ApiClient<T>, store: Rc<Store>, config: DashboardConfig) -> Self {
		Self::with_clock(api, store, config, browser_now)
	}

	pub fn with_clock(
		api: ApiClient<T>,
		store: Rc<Store>,
		config: DashboardConfig,
		clock: fn() -> String,
	) -> Self {
		Self {
			inner: Rc::new(Inner {
				api,
				store,
				config,
				clock,
			}),
		}
	}

	pub fn store(&self) -> &Rc<Store> {
		&self.inner.store
	}

	fn commit(&self, patch: StatePatch) {
		if let Err(err) = self.inner.store.set(patch) {
			debug!("patch dropped: {err}");
		}
	}

	/// Fire-and-forget entry point for event handlers. Local intents are
	/// applied before this returns; remote ones run on the local executor.
	pub fn spawn(&self, intent: Intent) {
		if intent.is_local() {
			self.apply_local(&intent);
			return;
		}
		let this = self.clone();
		spawn_local(async move { this.dispatch(intent).await });
	}

	pub async fn dispatch(&self, intent: Intent) {
		debug!("dispatch {intent:?}");
		if intent.is_local() {
			self.apply_local(&intent);
		} else {
			self.run_guarded(intent).await;
		}
	}

	fn apply_local(&self, intent: &Intent) {
		let patch = self.inner.store.with(|state| local_patch(state, intent));
		if let Some(patch) = patch {
			self.commit(patch);
		}
	}

	async fn run_guarded(&self, intent: Intent) {
		if self.inner.store.with(|s| s.busy) {
			warn!("busy; ignoring {intent:?}");
			// The refresh button is disabled while busy; only the timer lands here.
			if intent != Intent::Refresh {
				let patch = self.inner.store.with(|state| {
					StatePatch::default().toast(state, BUSY_MESSAGE, ToastKind::Err)
				});
				self.commit(patch);
			}
			return;
		}
		self.commit(StatePatch {
			busy: Some(true),
			..StatePatch::default()
		});

		let result = self.run_remote(&intent).await;

		let state = self.inner.store.get();
		let mut patch = StatePatch {
			busy: Some(false),
			..StatePatch::default()
		};
		match result {
			Ok(Some(message)) => patch = patch.toast(&state, message, ToastKind::Ok),
			Ok(None) => {}
			Err(err) => {
				let message = err.to_string();
				warn!("{intent:?} failed: {message}");
				patch.health = Some(Health::Degraded {
					message: truncate(&message, HEALTH_MESSAGE_LEN),
				});
				patch = patch.toast(&state, truncate(&message, TOAST_MESSAGE_LEN), ToastKind::Err);
			}
		}
		self.commit(patch);
	}

	/// Returns the success toast, if the intent has one.
	async fn run_remote(&self, intent: &Intent) -> Result<Option<String>> {
		if let Some(action) = intent.table_action() {
			self.inner.api.post(&action.path).await?;
			if let Intent::ApplyPreset(name) = intent {
				self.commit(StatePatch {
					preset_status: Some(format!("Applied preset: {name}")),
					..StatePatch::default()
				});
			}
			self.refresh_all().await?;
			return Ok(Some(action.toast));
		}
		match intent {
			Intent::Refresh => self.refresh_all().await?,
			Intent::LoadGraph(address) => self.load_graph(address).await?,
			Intent::LoadKnownGraph => self.load_known_graph().await?,
			Intent::LoadGlobalGraph => self.load_global_graph().await?,
			Intent::OpenRisk(address) => self.open_risk(address).await?,
			Intent::FocusAddress(address) => {
				// Navigation first so a failed risk lookup still re-centres.
				self.load_graph(address).await?;
				self.open_risk(address).await?;
			}
			_ => warn!("no remote handler for {intent:?}"),
		}
		Ok(None)
	}

	/// Reload summary, failures and taxonomy, and seed the graph from the
	/// first hot alert when nothing is focused yet.
	pub async fn refresh_all(&self) -> Result<()> {
		self.commit(StatePatch {
			loading: Some(true),
			..StatePatch::default()
		});
		match self.fetch_all().await {
			Ok(mut patch) => {
				patch.loading = Some(false);
				self.commit(patch);
				info!("refresh complete");
				Ok(())
			}
			Err(err) => {
				self.commit(StatePatch {
					degraded: Some(true),
					loading: Some(false),
					..StatePatch::default()
				});
				Err(err)
			}
		}
	}

	async fn fetch_all(&self) -> Result<StatePatch> {
		let Inner { api, config, .. } = &*self.inner;
		let (summary, failures, taxonomy) = futures::try_join!(
			api.summary(config.hot_limit),
			api.failures(config.failure_limit),
			api.taxonomy(),
		)?;

		let mut graph = None;
		if !self.inner.store.with(|s| s.graph.has_focus()) {
			let seed = summary
				.summary
				.hot_alerts
				.first()
				.map(|a| a.address.trim())
				.filter(|a| !a.is_empty());
			if let Some(seed) = seed {
				debug!("seeding flow graph from hot alert {seed}");
				graph = Some(api.neighbors(seed, config.neighbor_limit).await?);
			}
		}

		let status_line = format!(
			"lag={} | dead-letter={}",
			value_or_na(summary.compact.ingest_lag_blocks.as_ref()),
			summary.compact.dead_letter_open
		);
		Ok(StatePatch {
			summary: Some(summary),
			failures: Some(failures),
			taxonomy: Some(taxonomy),
			graph,
			health: Some(Health::Healthy {
				at: (self.inner.clock)(),
			}),
			status_line: Some(status_line),
			degraded: Some(false),
			..StatePatch::default()
		})
	}

	pub async fn load_graph(&self, address: &str) -> Result<()> {
		let address = address.trim();
		if address.is_empty() {
			return Ok(());
		}
		let graph = self
			.inner
			.api
			.neighbors(address, self.inner.config.neighbor_limit)
			.await?;
		info!(
			"loaded graph for {address}: {} nodes, {} edges",
			graph.nodes.len(),
			graph.edges.len()
		);
		self.commit(StatePatch {
			graph: Some(graph),
			active_panel: Some(Panel::Flow),
			..StatePatch::default()
		});
		Ok(())
	}

	/// First known address that loads wins. If none does, the last error is
	/// reported.
	async fn load_known_graph(&self) -> Result<()> {
		let mut last = None;
		for address in &self.inner.config.known_addresses {
			match self.load_graph(address).await {
				Ok(()) => return Ok(()),
				Err(err) => {
					debug!("known address {address} failed: {err}");
					last = Some(err);
				}
			}
		}
		match last {
			Some(err) => Err(err),
			None => Err(ApiError::Network("no known addresses configured".into())),
		}
	}

	async fn load_global_graph(&self) -> Result<()> {
		let graph = self
			.inner
			.api
			.global_graph(self.inner.config.global_limit)
			.await?;
		self.commit(StatePatch {
			graph: Some(graph),
			active_panel: Some(Panel::Flow),
			..StatePatch::default()
		});
		Ok(())
	}

	async fn open_risk(&self, address: &str) -> Result<()> {
		let risk = self.inner.api.risk(address.trim()).await?;
		self.commit(StatePatch {
			risk: Some(Some(risk)),
			..StatePatch::default()
		});
		Ok(())
	}
}
