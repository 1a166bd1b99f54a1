use leptos::prelude::*;

use crate::actions::{DispatchHandle, Intent};
use crate::api::types::FailureEntry;
use crate::format::truncate;
use crate::state::AppState;

const ERROR_PREVIEW_LEN: usize = 160;

fn block_or_dash(block: Option<u64>) -> String {
	block.map_or_else(|| "-".to_string(), |b| b.to_string())
}

/// `start → end`, with `-` for an open side.
pub fn block_range(entry: &FailureEntry) -> String {
	format!(
		"{} → {}",
		block_or_dash(entry.start_block),
		block_or_dash(entry.end_block)
	)
}

pub fn error_preview(entry: &FailureEntry) -> String {
	truncate(&entry.error, ERROR_PREVIEW_LEN)
}

/// Dead-letter queue table with retry/resolve actions.
#[component]
pub fn FailuresPanel(#[prop(into)] state: Signal<AppState>, dispatch: DispatchHandle) -> impl IntoView {
	let busy = Signal::derive(move || state.with(|s| s.busy));

	view! {
		<section class="card" class:skeleton=move || state.with(|s| s.loading)>
			<h3>"Dead-letter Queue"</h3>
			<table class="table">
				<thead>
					<tr>
						<th>"ID"</th>
						<th>"Range"</th>
						<th>"Retries"</th>
						<th>"Status"</th>
						<th>"Actions"</th>
					</tr>
				</thead>
				<tbody>
					{move || {
						state
							.with(|s| s.failures.clone())
							.into_iter()
							.map(|f| {
								let id = f.id;
								let (range, error) = (block_range(&f), error_preview(&f));
								view! {
									<tr>
										<td>{id}</td>
										<td>{range}</td>
										<td>{f.retry_count}</td>
										<td>{f.status}</td>
										<td class="actions">
											<button
												class="secondary"
												disabled=busy
												on:click=move |_| dispatch.dispatch(Intent::RetryFailure(id))
											>
												"Retry"
											</button>
											<button
												class="danger"
												disabled=busy
												on:click=move |_| dispatch.dispatch(Intent::ResolveFailure(id))
											>
												"Resolve"
											</button>
										</td>
									</tr>
									<tr>
										<td></td>
										<td colspan="4" class="muted">{error}</td>
									</tr>
								}
							})
							.collect_view()
					}}
				</tbody>
			</table>
			<Show when=move || state.with(|s| s.failures.is_empty())>
				<p class="muted">"No data"</p>
			</Show>
		</section>
	}
}
