use leptos::prelude::*;

use crate::actions::{DispatchHandle, Intent};
use crate::api::types::RiskProfile;
use crate::format::short_addr;
use crate::state::AppState;

pub fn factor_rows(risk: &RiskProfile) -> [(&'static str, f64); 4] {
	let f = &risk.factors;
	[
		("Label", f.label_risk),
		("Alert", f.alert_risk),
		("Centrality", f.centrality_risk),
		("Flow", f.flow_risk),
	]
}

pub fn score_line(risk: &RiskProfile) -> String {
	format!("{} ({})", risk.risk_score, risk.band)
}

/// Side drawer with the risk breakdown of one address. Hidden while no
/// profile is loaded.
#[component]
pub fn RiskDrawer(#[prop(into)] state: Signal<AppState>, dispatch: DispatchHandle) -> impl IntoView {
	let risk = Memo::new(move |_| state.with(|s| s.risk.clone()));

	view! {
		<aside class="drawer" class:hidden=move || risk.with(Option::is_none) tabindex="-1">
			<div class="drawer-head">
				<h3>"Entity Risk"</h3>
				<button class="secondary" on:click=move |_| dispatch.dispatch(Intent::CloseRisk)>
					"Close"
				</button>
			</div>
			{move || {
				risk.get()
					.map(|r| {
						let factors = factor_rows(&r)
							.into_iter()
							.map(|(label, value)| {
								view! {
									<div class="factor">
										<span>{label}</span>
										<strong>{value}</strong>
									</div>
								}
							})
							.collect_view();
						let chips = r
							.labels
							.iter()
							.map(|l| {
								view! {
									<span class="chip">{format!("{} {:.2}", l.label, l.confidence)}</span>
								}
							})
							.collect_view();
						view! {
							<div class="row">
								<span>"Address"</span>
								<strong>{short_addr(&r.address)}</strong>
							</div>
							<div class="row">
								<span>"Risk Score"</span>
								<strong>{score_line(&r)}</strong>
							</div>
							{factors}
							<div class="chips">{chips}</div>
						}
					})
			}}
		</aside>
	}
}
