use leptos::prelude::*;

use crate::actions::{DispatchHandle, Intent};
use crate::components::feedback::{DegradedBanner, HealthIndicator, ToastHost};
use crate::components::panels::{
	FailuresPanel, FlowPanel, KpiTiles, OverviewPanel, RiskDrawer, TaxonomyPanel,
};
use crate::state::{AppState, Panel};

/// The single dashboard page: nav, header, the active panel and overlays.
#[component]
pub fn Dashboard(#[prop(into)] state: Signal<AppState>, dispatch: DispatchHandle) -> impl IntoView {
	let active = Memo::new(move |_| state.with(|s| s.active_panel));
	let busy = Signal::derive(move || state.with(|s| s.busy));

	view! {
		<div class="layout">
			<nav class="side">
				<h2>"Flow Ops"</h2>
				{Panel::ALL
					.iter()
					.map(|panel| {
						let panel = *panel;
						view! {
							<button
								class="nav-btn"
								class:active=move || active.get() == panel
								on:click=move |_| dispatch.dispatch(Intent::Navigate(panel))
							>
								{panel.title()}
							</button>
						}
					})
					.collect_view()}
			</nav>
			<main>
				<header class="top">
					<div>
						<h1>{move || active.get().title()}</h1>
						<p class="muted">{move || active.get().subtitle()}</p>
					</div>
					<HealthIndicator state=state />
					<button disabled=busy on:click=move |_| dispatch.dispatch(Intent::Refresh)>
						"Refresh"
					</button>
				</header>
				<DegradedBanner state=state />
				<KpiTiles state=state />
				{move || match active.get() {
					Panel::Overview => view! { <OverviewPanel state=state dispatch=dispatch /> }.into_any(),
					Panel::Flow => view! { <FlowPanel state=state dispatch=dispatch /> }.into_any(),
					Panel::Taxonomy => view! { <TaxonomyPanel state=state /> }.into_any(),
					Panel::Failures => view! { <FailuresPanel state=state dispatch=dispatch /> }.into_any(),
				}}
			</main>
			<RiskDrawer state=state dispatch=dispatch />
			<ToastHost state=state dispatch=dispatch />
		</div>
	}
}
