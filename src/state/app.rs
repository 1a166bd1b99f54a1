//! Shape of the dashboard state and the partial updates merged into it.

use crate::api::types::{DashboardSummary, FailureEntry, RiskProfile, Taxonomy};
use crate::components::force_graph::{
	FilteredGraph, GraphSnapshot, GraphView, LayoutMode, filter, graph_meta,
};

/// Top-level views selectable from the nav bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Panel {
	#[default]
	Overview,
	Flow,
	Taxonomy,
	Failures,
}

impl Panel {
	pub const ALL: [Panel; 4] = [Panel::Overview, Panel::Flow, Panel::Taxonomy, Panel::Failures];

	pub fn title(self) -> &'static str {
		match self {
			Panel::Overview => "Overview",
			Panel::Flow => "Flow Graph",
			Panel::Taxonomy => "Taxonomy",
			Panel::Failures => "Failures",
		}
	}

	pub fn subtitle(self) -> &'static str {
		match self {
			Panel::Overview => "Core operations dashboard",
			Panel::Flow => "Address neighbors and flow links",
			Panel::Taxonomy => "Label mapping and rules",
			Panel::Failures => "Dead-letter queue operations",
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Health {
	#[default]
	Unknown,
	/// Last refresh succeeded at the given ISO timestamp.
	Healthy { at: String },
	Degraded { message: String },
}

impl Health {
	pub fn dot_class(&self) -> &'static str {
		match self {
			Health::Unknown => "health-dot",
			Health::Healthy { .. } => "health-dot ok",
			Health::Degraded { .. } => "health-dot crit",
		}
	}

	pub fn last_updated(&self) -> String {
		match self {
			Health::Unknown => "never".to_string(),
			Health::Healthy { at } => at.clone(),
			Health::Degraded { message } => format!("error: {message}"),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
	Ok,
	Err,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
	pub id: u64,
	pub message: String,
	pub kind: ToastKind,
}

/// The one state object of the app. Mutated only through
/// [`Store::set`](super::Store::set).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
	pub active_panel: Panel,
	pub summary: Option<DashboardSummary>,
	pub failures: Vec<FailureEntry>,
	pub taxonomy: Taxonomy,
	pub graph: GraphSnapshot,
	pub graph_view: GraphView,
	pub layout_mode: LayoutMode,
	/// Bumped by every view reset so the canvas restores its transform.
	pub view_epoch: u64,
	pub risk: Option<RiskProfile>,
	pub health: Health,
	pub status_line: String,
	pub degraded: bool,
	pub busy: bool,
	pub loading: bool,
	pub preset_status: Option<String>,
	pub toasts: Vec<Toast>,
	pub next_toast_id: u64,
}

impl AppState {
	pub fn filtered_graph(&self) -> FilteredGraph {
		filter(&self.graph, &self.graph_view)
	}

	pub fn graph_status(&self) -> String {
		graph_meta(&self.filtered_graph(), &self.graph_view, self.layout_mode)
	}

	/// Summary, or an all-defaults one before the first successful refresh.
	pub fn summary_or_default(&self) -> DashboardSummary {
		self.summary.clone().unwrap_or_default()
	}

	/// Toast list with one more message, and the id counter after it.
	pub fn with_toast(&self, message: impl Into<String>, kind: ToastKind) -> (Vec<Toast>, u64) {
		let mut toasts = self.toasts.clone();
		toasts.push(Toast {
			id: self.next_toast_id,
			message: message.into(),
			kind,
		});
		(toasts, self.next_toast_id + 1)
	}
}

/// A partial update. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatePatch {
	pub active_panel: Option<Panel>,
	pub summary: Option<DashboardSummary>,
	pub failures: Option<Vec<FailureEntry>>,
	pub taxonomy: Option<Taxonomy>,
	pub graph: Option<GraphSnapshot>,
	pub graph_view: Option<GraphView>,
	pub layout_mode: Option<LayoutMode>,
	pub view_epoch: Option<u64>,
	/// `Some(None)` closes the risk drawer.
	pub risk: Option<Option<RiskProfile>>,
	pub health: Option<Health>,
	pub status_line: Option<String>,
	pub degraded: Option<bool>,
	pub busy: Option<bool>,
	pub loading: Option<bool>,
	pub preset_status: Option<String>,
	pub toasts: Option<Vec<Toast>>,
	pub next_toast_id: Option<u64>,
}

impl StatePatch {
	/// Append a toast on top of the current state.
	pub fn toast(mut self, state: &AppState, message: impl Into<String>, kind: ToastKind) -> Self {
		let (toasts, next) = state.with_toast(message, kind);
		self.toasts = Some(toasts);
		self.next_toast_id = Some(next);
		self
	}

	pub fn merge_into(self, state: &mut AppState) {
		macro_rules! merge {
			($($field:ident),* $(,)?) => {
				$(if let Some(value) = self.$field {
					state.$field = value;
				})*
			};
		}
		merge!(
			active_panel,
			failures,
			taxonomy,
			graph,
			graph_view,
			layout_mode,
			view_epoch,
			risk,
			health,
			status_line,
			degraded,
			busy,
			loading,
			toasts,
			next_toast_id,
		);
		if let Some(summary) = self.summary {
			state.summary = Some(summary);
		}
		if let Some(status) = self.preset_status {
			state.preset_status = Some(status);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::Direction;

	#[test]
	fn merge_only_touches_set_fields() {
		let mut state = AppState {
			status_line: "lag=1".into(),
			..AppState::default()
		};
		StatePatch {
			busy: Some(true),
			graph_view: Some(GraphView {
				min_tx: 3,
				direction: Direction::In,
				scale: 1.0,
			}),
			..StatePatch::default()
		}
		.merge_into(&mut state);

		assert!(state.busy);
		assert_eq!(state.graph_view.min_tx, 3);
		assert_eq!(state.status_line, "lag=1");
		assert_eq!(state.active_panel, Panel::Overview);
	}

	#[test]
	fn risk_patch_can_close_drawer() {
		let mut state = AppState {
			risk: Some(RiskProfile::default()),
			..AppState::default()
		};
		StatePatch {
			risk: Some(None),
			..StatePatch::default()
		}
		.merge_into(&mut state);
		assert!(state.risk.is_none());
	}

	#[test]
	fn toasts_get_increasing_ids() {
		let mut state = AppState::default();
		StatePatch::default()
			.toast(&state, "first", ToastKind::Ok)
			.merge_into(&mut state);
		StatePatch::default()
			.toast(&state, "second", ToastKind::Err)
			.merge_into(&mut state);
		let ids: Vec<u64> = state.toasts.iter().map(|t| t.id).collect();
		assert_eq!(ids, vec![0, 1]);
		assert_eq!(state.toasts[1].kind, ToastKind::Err);
	}

	#[test]
	fn health_text() {
		assert_eq!(Health::Unknown.last_updated(), "never");
		assert_eq!(
			Health::Degraded {
				message: "boom".into()
			}
			.last_updated(),
			"error: boom"
		);
		assert_eq!(Panel::Flow.title(), "Flow Graph");
	}
}
