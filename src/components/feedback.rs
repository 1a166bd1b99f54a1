//! Toasts, the degraded banner and the health indicator.

use std::time::Duration;

use leptos::prelude::*;

use crate::actions::{DispatchHandle, Intent};
use crate::state::{AppState, Toast, ToastKind};

const TOAST_TTL: Duration = Duration::from_millis(2800);

fn toast_class(kind: ToastKind) -> &'static str {
	match kind {
		ToastKind::Ok => "toast ok",
		ToastKind::Err => "toast err",
	}
}

#[component]
fn ToastItem(toast: Toast, dispatch: DispatchHandle) -> impl IntoView {
	let id = toast.id;
	set_timeout(move || dispatch.dispatch(Intent::DismissToast(id)), TOAST_TTL);
	view! { <div class=toast_class(toast.kind)>{toast.message}</div> }
}

#[component]
pub fn ToastHost(#[prop(into)] state: Signal<AppState>, dispatch: DispatchHandle) -> impl IntoView {
	view! {
		<div class="toast-host">
			<For
				each=move || state.with(|s| s.toasts.clone())
				key=|t| t.id
				children=move |toast| view! { <ToastItem toast=toast dispatch=dispatch /> }
			/>
		</div>
	}
}

#[component]
pub fn DegradedBanner(#[prop(into)] state: Signal<AppState>) -> impl IntoView {
	view! {
		<div class="banner" class:hidden=move || !state.with(|s| s.degraded)>
			"API degraded: showing the last successful data."
		</div>
	}
}

/// Health dot, last-updated text and the one-line status bar.
#[component]
pub fn HealthIndicator(#[prop(into)] state: Signal<AppState>) -> impl IntoView {
	view! {
		<div class="health">
			<span class=move || state.with(|s| s.health.dot_class())></span>
			<span class="muted">{move || state.with(|s| s.health.last_updated())}</span>
			<span class="status-bar">{move || state.with(|s| s.status_line.clone())}</span>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn toast_classes() {
		assert_eq!(toast_class(ToastKind::Ok), "toast ok");
		assert_eq!(toast_class(ToastKind::Err), "toast err");
	}
}
