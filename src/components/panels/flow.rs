use leptos::ev::MouseEvent;
use leptos::prelude::*;

use crate::actions::{DispatchHandle, Intent};
use crate::components::force_graph::{
	Direction, FilteredGraph, ForceGraphCanvas, LayoutMode, RadialGraph,
};
use crate::state::AppState;

/// The min-tx box falls back to 1 when empty or not a number.
pub fn parse_min_tx(value: &str) -> i64 {
	value.trim().parse().unwrap_or(1)
}

/// Address loader, filter and zoom controls, and the graph itself.
#[component]
pub fn FlowPanel(#[prop(into)] state: Signal<AppState>, dispatch: DispatchHandle) -> impl IntoView {
	let busy = Signal::derive(move || state.with(|s| s.busy));
	let graph: Memo<FilteredGraph> = Memo::new(move |_| state.with(AppState::filtered_graph));
	let center = Memo::new(move |_| state.with(|s| s.graph.center.clone()));
	let scale = Memo::new(move |_| state.with(|s| s.graph_view.scale));
	let epoch = Memo::new(move |_| state.with(|s| s.view_epoch));
	let mode = Memo::new(move |_| state.with(|s| s.layout_mode));
	let status = move || state.with(AppState::graph_status);

	let address_ref = NodeRef::<leptos::html::Input>::new();
	let min_tx_ref = NodeRef::<leptos::html::Input>::new();
	let direction_ref = NodeRef::<leptos::html::Select>::new();

	let load = move |_: MouseEvent| {
		if let Some(input) = address_ref.get() {
			dispatch.dispatch(Intent::LoadGraph(input.value()));
		}
	};
	let apply_filters = move |_: MouseEvent| {
		let min_tx = min_tx_ref.get().map(|i| parse_min_tx(&i.value())).unwrap_or(1);
		let direction = direction_ref
			.get()
			.and_then(|s| Direction::parse(&s.value()))
			.unwrap_or_default();
		dispatch.dispatch(Intent::ApplyGraphFilters { min_tx, direction });
	};
	let on_node_click = dispatch.callback(Intent::FocusAddress);
	let on_zoom = dispatch.callback(Intent::SetZoom);

	view! {
		<section class="card">
			<div class="toolbar">
				<input
					node_ref=address_ref
					class="address-input"
					placeholder="0x… address"
					prop:value=move || center.get()
				/>
				<button disabled=busy on:click=load>
					"Load"
				</button>
				<button
					class="secondary"
					disabled=busy
					on:click=move |_| dispatch.dispatch(Intent::LoadKnownGraph)
				>
					"Load known"
				</button>
				<button
					class="secondary"
					disabled=busy
					on:click=move |_| dispatch.dispatch(Intent::LoadGlobalGraph)
				>
					"Load global sample"
				</button>
			</div>
			<div class="toolbar">
				<label>
					"min tx "
					<input
						node_ref=min_tx_ref
						type="number"
						min="0"
						prop:value=move || state.with(|s| s.graph_view.min_tx.to_string())
					/>
				</label>
				<select node_ref=direction_ref>
					{Direction::ALL
						.into_iter()
						.map(|d| {
							let value = d.as_str();
							view! {
								<option
									value=value
									selected=move || state.with(|s| s.graph_view.direction) == d
								>
									{value}
								</option>
							}
						})
						.collect_view()}
				</select>
				<button class="secondary" on:click=apply_filters>
					"Apply"
				</button>
				<button class="secondary" on:click=move |_| dispatch.dispatch(Intent::ZoomIn)>
					"+"
				</button>
				<button class="secondary" on:click=move |_| dispatch.dispatch(Intent::ZoomOut)>
					"−"
				</button>
				<button class="secondary" on:click=move |_| dispatch.dispatch(Intent::ResetGraphView)>
					"Reset"
				</button>
				<button
					class="secondary"
					on:click=move |_| {
						dispatch.dispatch(Intent::SetLayoutMode(mode.get_untracked().toggled()))
					}
				>
					{move || format!("Layout: {}", mode.get().label())}
				</button>
			</div>
			{move || match mode.get() {
				LayoutMode::Force => {
					view! {
						<ForceGraphCanvas
							graph=graph
							scale=scale
							reset_epoch=epoch
							on_node_click=on_node_click
							on_zoom=on_zoom
						/>
					}
						.into_any()
				}
				LayoutMode::Radial => {
					view! { <RadialGraph graph=graph scale=scale on_node_click=on_node_click /> }
						.into_any()
				}
			}}
			<p class="muted graph-meta">{status}</p>
		</section>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn min_tx_input_parsing() {
		assert_eq!(parse_min_tx("3"), 3);
		assert_eq!(parse_min_tx(" -2 "), -2);
		assert_eq!(parse_min_tx(""), 1);
		assert_eq!(parse_min_tx("lots"), 1);
	}
}
