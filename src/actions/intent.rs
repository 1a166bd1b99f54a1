use crate::components::force_graph::{Direction, LayoutMode};
use crate::state::Panel;

/// Everything a user (or the refresh timer) can ask the dashboard to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
	Refresh,
	AckAlert(u64),
	ResolveAlert(u64),
	RetryFailure(u64),
	ResolveFailure(u64),
	ApplyPreset(String),
	/// Fetch the neighbors of an address and show the flow panel.
	LoadGraph(String),
	/// Try the configured known addresses in order until one loads.
	LoadKnownGraph,
	LoadGlobalGraph,
	OpenRisk(String),
	/// Load the graph around an address, then open its risk drawer.
	FocusAddress(String),

	Navigate(Panel),
	/// Negative `min_tx` is floored at 0.
	ApplyGraphFilters {
		min_tx: i64,
		direction: Direction,
	},
	ZoomIn,
	ZoomOut,
	SetZoom(f64),
	ResetGraphView,
	SetLayoutMode(LayoutMode),
	CloseRisk,
	DismissToast(u64),
}

/// A table button: one POST, a success message, then a full refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableAction {
	pub path: String,
	pub toast: String,
}

impl Intent {
	/// Intents that only patch state: no network, no busy gate.
	pub fn is_local(&self) -> bool {
		matches!(
			self,
			Intent::Navigate(_)
				| Intent::ApplyGraphFilters { .. }
				| Intent::ZoomIn
				| Intent::ZoomOut
				| Intent::SetZoom(_)
				| Intent::ResetGraphView
				| Intent::SetLayoutMode(_)
				| Intent::CloseRisk
				| Intent::DismissToast(_)
		)
	}

	/// The dispatch table for table and preset buttons.
	pub fn table_action(&self) -> Option<TableAction> {
		let (path, toast) = match self {
			Intent::AckAlert(id) => (
				format!("/alerts/{id}/ack?assignee=ui"),
				format!("Alert {id} acknowledged"),
			),
			Intent::ResolveAlert(id) => (
				format!("/alerts/{id}/resolve?assignee=ui"),
				format!("Alert {id} resolved"),
			),
			Intent::RetryFailure(id) => (
				format!("/runbook/failures/{id}/retry"),
				format!("Failure {id} queued for retry"),
			),
			Intent::ResolveFailure(id) => (
				format!("/runbook/failures/{id}/resolve"),
				format!("Failure {id} resolved"),
			),
			Intent::ApplyPreset(name) => (
				format!("/runbook/threshold-presets/{name}"),
				format!("Preset applied: {name}"),
			),
			_ => return None,
		};
		Some(TableAction { path, toast })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn table_paths_and_messages() {
		let ack = Intent::AckAlert(42).table_action().unwrap();
		assert_eq!(ack.path, "/alerts/42/ack?assignee=ui");
		assert_eq!(ack.toast, "Alert 42 acknowledged");

		let retry = Intent::RetryFailure(7).table_action().unwrap();
		assert_eq!(retry.path, "/runbook/failures/7/retry");
		assert_eq!(retry.toast, "Failure 7 queued for retry");

		let preset = Intent::ApplyPreset("quiet".into()).table_action().unwrap();
		assert_eq!(preset.path, "/runbook/threshold-presets/quiet");
		assert_eq!(preset.toast, "Preset applied: quiet");

		assert_eq!(Intent::Refresh.table_action(), None);
		assert_eq!(Intent::LoadGraph("0xabc".into()).table_action(), None);
	}

	#[test]
	fn local_and_remote_split() {
		assert!(Intent::ZoomIn.is_local());
		assert!(Intent::DismissToast(3).is_local());
		assert!(!Intent::Refresh.is_local());
		assert!(!Intent::ResolveFailure(1).is_local());
		assert!(!Intent::FocusAddress("0xabc".into()).is_local());
	}
}
