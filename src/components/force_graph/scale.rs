//! Visual scaling: edge weight styling and zoom bounds.

pub const MIN_ZOOM: f64 = 0.15;
pub const MAX_ZOOM: f64 = 4.0;
pub const ZOOM_IN_STEP: f64 = 1.3;
pub const ZOOM_OUT_STEP: f64 = 0.77;

const MIN_OPACITY: f64 = 0.25;
const OPACITY_RANGE: f64 = 0.65;
const MIN_WIDTH: f64 = 1.0;
const WIDTH_RANGE: f64 = 3.0;

/// Stroke parameters for one edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	pub opacity: f64,
	pub width: f64,
}

/// Style an edge by its weight relative to the heaviest visible edge.
pub fn edge_style(tx_count: u64, max_tx: u64) -> EdgeStyle {
	let ratio = if max_tx == 0 {
		0.0
	} else {
		(tx_count as f64 / max_tx as f64).clamp(0.0, 1.0)
	};
	EdgeStyle {
		opacity: MIN_OPACITY + OPACITY_RANGE * ratio,
		width: MIN_WIDTH + WIDTH_RANGE * ratio,
	}
}

pub fn clamp_zoom(k: f64) -> f64 {
	if k.is_finite() {
		k.clamp(MIN_ZOOM, MAX_ZOOM)
	} else {
		1.0
	}
}

pub fn zoom_in(k: f64) -> f64 {
	clamp_zoom(k * ZOOM_IN_STEP)
}

pub fn zoom_out(k: f64) -> f64 {
	clamp_zoom(k * ZOOM_OUT_STEP)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn heavier_edges_are_never_lighter() {
		let max = 37;
		for a in 0..=max {
			for b in 0..a {
				let (heavy, light) = (edge_style(a, max), edge_style(b, max));
				assert!(heavy.opacity >= light.opacity);
				assert!(heavy.width >= light.width);
			}
		}
	}

	#[test]
	fn heaviest_edge_gets_full_weight() {
		let style = edge_style(10, 10);
		assert!((style.opacity - 0.9).abs() < 1e-9);
		assert!((style.width - 4.0).abs() < 1e-9);
		assert_eq!(edge_style(0, 0), edge_style(0, 10));
	}

	#[test]
	fn zoom_steps_are_bounded() {
		let mut k = 1.0;
		for _ in 0..50 {
			k = zoom_in(k);
		}
		assert_eq!(k, MAX_ZOOM);
		for _ in 0..50 {
			k = zoom_out(k);
		}
		assert_eq!(k, MIN_ZOOM);
		assert_eq!(clamp_zoom(f64::NAN), 1.0);
	}
}
