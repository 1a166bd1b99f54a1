use leptos::prelude::*;

use crate::api::types::Taxonomy;
use crate::state::AppState;

const ROOT_LABEL: &str = "Label Taxonomy";
const ROOT: (f64, f64) = (130.0, 130.0);
const LEAF_X: f64 = 520.0;
const TREE_HEIGHT: f64 = 260.0;

/// A label box in the taxonomy tree, centred on `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafBox {
	pub x: f64,
	pub y: f64,
	pub label: String,
}

/// One leaf per label, spread evenly down the right-hand column.
pub fn tree_leaves(taxonomy: &Taxonomy) -> Vec<LeafBox> {
	let gap = TREE_HEIGHT / (taxonomy.len() as f64 + 1.0);
	taxonomy
		.iter()
		.enumerate()
		.map(|(i, (name, _))| LeafBox {
			x: LEAF_X,
			y: gap * (i as f64 + 1.0),
			label: name.clone(),
		})
		.collect()
}

#[component]
pub fn TaxonomyPanel(#[prop(into)] state: Signal<AppState>) -> impl IntoView {
	let taxonomy = Memo::new(move |_| state.with(|s| s.taxonomy.clone()));

	view! {
		<section class="card">
			<svg class="graph-svg" viewBox="0 0 760 280">
				{move || {
					let leaves = tree_leaves(&taxonomy.get());
					if leaves.is_empty() {
						return view! {
							<text class="g-label" x="20" y="30">
								"Taxonomy unavailable."
							</text>
						}
							.into_any();
					}
					let (rx, ry) = ROOT;
					let links = leaves
						.iter()
						.map(|n| {
							view! {
								<line
									class="g-link"
									x1={(rx + 30.0).to_string()}
									y1={ry.to_string()}
									x2={(n.x - 26.0).to_string()}
									y2={n.y.to_string()}
								/>
							}
						})
						.collect_view();
					let boxes = leaves
						.into_iter()
						.map(|n| {
							view! {
								<rect
									class="tax-leaf"
									x={(n.x - 56.0).to_string()}
									y={(n.y - 16.0).to_string()}
									width="112"
									height="32"
									rx="10"
								/>
								<text class="g-label" x={(n.x - 44.0).to_string()} y={(n.y + 4.0).to_string()}>
									{n.label}
								</text>
							}
						})
						.collect_view();
					view! {
						<g>
							{links}
							<rect class="tax-root" x="68" y="112" width="124" height="36" rx="10" />
							<text class="g-label" x="86" y="134">
								{ROOT_LABEL}
							</text>
							{boxes}
						</g>
					}
						.into_any()
				}}
			</svg>
			<div class="taxonomy-meta">
				{move || {
					taxonomy
						.get()
						.into_iter()
						.map(|(name, rule)| {
							view! {
								<div class="row">
									<span>{name}</span>
									<span class="muted">{rule.rule}</span>
								</div>
							}
						})
						.collect_view()
				}}
			</div>
		</section>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::types::LabelRule;

	#[test]
	fn leaves_are_spaced_evenly() {
		let taxonomy: Taxonomy = ["bridge", "router", "whale"]
			.iter()
			.map(|n| (n.to_string(), LabelRule::default()))
			.collect();
		let leaves = tree_leaves(&taxonomy);
		let ys: Vec<f64> = leaves.iter().map(|l| l.y).collect();
		assert_eq!(ys, vec![65.0, 130.0, 195.0]);
		assert!(leaves.iter().all(|l| l.x == LEAF_X));
		assert_eq!(leaves[1].label, "router");
	}

	#[test]
	fn empty_taxonomy_has_no_leaves() {
		assert!(tree_leaves(&Taxonomy::new()).is_empty());
	}
}
