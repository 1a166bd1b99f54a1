use leptos::prelude::*;

use crate::actions::{DispatchHandle, Intent};
use crate::api::types::{DashboardSummary, HotAlert};
use crate::format::{severity_class, short_addr, value_or_na};
use crate::state::AppState;

/// Threshold presets offered by the runbook panel.
pub const PRESETS: &[&str] = &["conservative", "balanced", "aggressive"];

/// One KPI tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Kpi {
	pub label: &'static str,
	pub value: String,
	pub sub: &'static str,
}

pub fn kpis(summary: &DashboardSummary) -> Vec<Kpi> {
	let c = &summary.compact;
	vec![
		Kpi {
			label: "Ingest Lag",
			value: value_or_na(c.ingest_lag_blocks.as_ref()),
			sub: "blocks",
		},
		Kpi {
			label: "Alerts 24h",
			value: c.alerts_24h.to_string(),
			sub: "",
		},
		Kpi {
			label: "Queue Pressure",
			value: value_or_na(c.backlog_pressure.as_ref()),
			sub: "",
		},
		Kpi {
			label: "Dead-letter Open",
			value: c.dead_letter_open.to_string(),
			sub: "",
		},
	]
}

/// Label/value rows of the ops queue card.
pub fn ops_rows(summary: &DashboardSummary) -> Vec<(&'static str, String)> {
	let s = &summary.summary;
	let counts = &s.queue.queue_counts;
	vec![
		("Queue New", counts.new.to_string()),
		("Queue Ack", counts.ack.to_string()),
		("Queue Resolved", counts.resolved.to_string()),
		("Backlog Pressure", value_or_na(s.queue.backlog_pressure.as_ref())),
		("Dead-letter Open", s.dead_letter.open.to_string()),
	]
}

#[component]
pub fn KpiTiles(#[prop(into)] state: Signal<AppState>) -> impl IntoView {
	view! {
		<section class="kpis" class:skeleton=move || state.with(|s| s.loading)>
			{move || {
				kpis(&state.with(AppState::summary_or_default))
					.into_iter()
					.map(|k| {
						view! {
							<article class="kpi">
								<div class="muted">{k.label}</div>
								<div class="v">{k.value}</div>
								<div class="muted">{k.sub}</div>
							</article>
						}
					})
					.collect_view()
			}}
		</section>
	}
}

fn alert_row(alert: HotAlert, busy: Signal<bool>, dispatch: DispatchHandle) -> impl IntoView {
	let id = alert.id;
	let address = alert.address.clone();
	let badge = format!("badge {}", severity_class(&alert.severity));
	let label = short_addr(&alert.address);
	view! {
		<tr>
			<td>
				<span class=badge>{alert.severity}</span>
			</td>
			<td>{alert.kind}</td>
			<td>
				<button
					class="addr-btn"
					disabled=busy
					on:click=move |_| dispatch.dispatch(Intent::FocusAddress(address.clone()))
				>
					{label}
				</button>
			</td>
			<td>{format!("{:.2}", alert.confidence)}</td>
			<td class="actions">
				<button
					class="secondary"
					disabled=busy
					on:click=move |_| dispatch.dispatch(Intent::AckAlert(id))
				>
					"Ack"
				</button>
				<button
					class="danger"
					disabled=busy
					on:click=move |_| dispatch.dispatch(Intent::ResolveAlert(id))
				>
					"Resolve"
				</button>
			</td>
		</tr>
	}
}

/// Hot alerts, top types and addresses, queue status and threshold presets.
#[component]
pub fn OverviewPanel(#[prop(into)] state: Signal<AppState>, dispatch: DispatchHandle) -> impl IntoView {
	let busy = Signal::derive(move || state.with(|s| s.busy));
	let loading = move || state.with(|s| s.loading);
	let summary = Memo::new(move |_| state.with(AppState::summary_or_default));

	view! {
		<div class="grid two">
			<section class="card" class:skeleton=loading>
				<h3>"Hot Alerts"</h3>
				<table class="table">
					<thead>
						<tr>
							<th>"Severity"</th>
							<th>"Type"</th>
							<th>"Address"</th>
							<th>"Conf"</th>
							<th>"Actions"</th>
						</tr>
					</thead>
					<tbody>
						{move || {
							summary
								.get()
								.summary
								.hot_alerts
								.into_iter()
								.map(|a| alert_row(a, busy, dispatch))
								.collect_view()
						}}
					</tbody>
				</table>
			</section>
			<section class="card" class:skeleton=loading>
				<h3>"Runbook Ops"</h3>
				{move || {
					ops_rows(&summary.get())
						.into_iter()
						.map(|(label, value)| {
							view! {
								<div class="row">
									<span>{label}</span>
									<strong>{value}</strong>
								</div>
							}
						})
						.collect_view()
				}}
				<div class="presets">
					{PRESETS
						.iter()
						.map(|name| {
							view! {
								<button
									class="secondary"
									disabled=busy
									on:click=move |_| dispatch.dispatch(Intent::ApplyPreset(name.to_string()))
								>
									{*name}
								</button>
							}
						})
						.collect_view()}
				</div>
				<p class="muted">{move || state.with(|s| s.preset_status.clone().unwrap_or_default())}</p>
			</section>
			<section class="card">
				<h3>"Top Alert Types (24h)"</h3>
				{move || {
					let rows = summary.get().summary.top_alert_types_24h;
					if rows.is_empty() {
						return view! { <p class="muted">"No data"</p> }.into_any();
					}
					rows.into_iter()
						.map(|r| {
							view! {
								<div class="row">
									<span>{r.kind}</span>
									<strong>{r.count}</strong>
								</div>
							}
						})
						.collect_view()
						.into_any()
				}}
			</section>
			<section class="card" class:skeleton=loading>
				<h3>"Top Alert Addresses (24h)"</h3>
				{move || {
					let rows = summary.get().summary.top_alert_addresses_24h;
					if rows.is_empty() {
						return view! { <p class="muted">"No data"</p> }.into_any();
					}
					rows.into_iter()
						.map(|r| {
							let label = short_addr(&r.address);
							let address = r.address;
							view! {
								<div class="row">
									<button
										class="addr-btn"
										disabled=busy
										on:click=move |_| dispatch.dispatch(Intent::FocusAddress(address.clone()))
									>
										{label}
									</button>
									<strong>{r.count}</strong>
								</div>
							}
						})
						.collect_view()
						.into_any()
				}}
			</section>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn kpis_default_before_first_refresh() {
		let tiles = kpis(&DashboardSummary::default());
		let values: Vec<&str> = tiles.iter().map(|k| k.value.as_str()).collect();
		assert_eq!(values, vec!["n/a", "0", "n/a", "0"]);
		assert_eq!(tiles[0].sub, "blocks");
	}

	#[test]
	fn kpis_render_backend_values() {
		let summary: DashboardSummary = serde_json::from_value(json!({
			"compact": {
				"ingest_lag_blocks": 12,
				"alerts_24h": 5,
				"backlog_pressure": "high",
				"dead_letter_open": 1
			}
		}))
		.unwrap();
		let values: Vec<String> = kpis(&summary).into_iter().map(|k| k.value).collect();
		assert_eq!(values, vec!["12", "5", "high", "1"]);
	}

	#[test]
	fn ops_rows_default_to_zero_and_na() {
		let rows = ops_rows(&DashboardSummary::default());
		assert_eq!(rows.len(), 5);
		assert_eq!(rows[0], ("Queue New", "0".to_string()));
		assert_eq!(rows[3], ("Backlog Pressure", "n/a".to_string()));
	}
}
