//! Read-only projections of [`AppState`](crate::state::AppState) into views.
//!
//! Each panel's text is built by a small pure function so that the defaults
//! shown before the first refresh can be checked without a browser.

pub mod failures;
pub mod flow;
pub mod overview;
pub mod risk;
pub mod taxonomy;

pub use failures::FailuresPanel;
pub use flow::FlowPanel;
pub use overview::{KpiTiles, OverviewPanel};
pub use risk::RiskDrawer;
pub use taxonomy::TaxonomyPanel;
