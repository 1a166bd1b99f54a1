//! Wire shapes of the monitoring API.
//!
//! Every field is defaulted so that partial payloads decode into one
//! normalized shape; renderers never see a missing field.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::components::force_graph::{GraphEdge, GraphNode, GraphSnapshot};

/// Treat an explicit `null` like a missing field.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// `GET /dashboard/summary`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
	pub compact: Compact,
	pub summary: SummaryBody,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Compact {
	pub ingest_lag_blocks: Option<Value>,
	#[serde(deserialize_with = "lenient")]
	pub alerts_24h: u64,
	pub backlog_pressure: Option<Value>,
	#[serde(deserialize_with = "lenient")]
	pub dead_letter_open: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SummaryBody {
	pub hot_alerts: Vec<HotAlert>,
	pub top_alert_types_24h: Vec<TypeCount>,
	pub top_alert_addresses_24h: Vec<AddressCount>,
	pub queue: QueueStatus,
	pub dead_letter: DeadLetter,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HotAlert {
	pub id: u64,
	#[serde(deserialize_with = "lenient")]
	pub severity: String,
	#[serde(rename = "type")]
	#[serde(deserialize_with = "lenient")]
	pub kind: String,
	#[serde(deserialize_with = "lenient")]
	pub address: String,
	#[serde(deserialize_with = "lenient")]
	pub confidence: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypeCount {
	#[serde(rename = "type")]
	pub kind: String,
	pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AddressCount {
	pub address: String,
	pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueueStatus {
	pub queue_counts: QueueCounts,
	pub backlog_pressure: Option<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueueCounts {
	pub new: u64,
	pub ack: u64,
	pub resolved: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeadLetter {
	pub open: u64,
}

/// `GET /runbook/failures`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FailuresPage {
	pub failures: Vec<FailureEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FailureEntry {
	pub id: u64,
	pub start_block: Option<u64>,
	pub end_block: Option<u64>,
	#[serde(deserialize_with = "lenient")]
	pub retry_count: u64,
	#[serde(deserialize_with = "lenient")]
	pub status: String,
	#[serde(deserialize_with = "lenient")]
	pub error: String,
}

/// `GET /labels/taxonomy`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaxonomyPayload {
	pub labels: serde_json::Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelRule {
	pub rule: String,
	pub source: String,
	pub description: String,
}

/// Label name and its rule, in payload order.
pub type Taxonomy = Vec<(String, LabelRule)>;

impl TaxonomyPayload {
	/// Entries whose body is not an object keep an empty rule.
	pub fn into_taxonomy(self) -> Taxonomy {
		self.labels
			.into_iter()
			.map(|(name, body)| {
				let rule = serde_json::from_value(body).unwrap_or_default();
				(name, rule)
			})
			.collect()
	}
}

/// `GET /graph/neighbors/{address}` and `GET /graph/global`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphPayload {
	pub nodes: Vec<WireNode>,
	pub edges: Vec<WireEdge>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WireNode {
	pub id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WireEdge {
	pub src: Option<String>,
	pub dst: Option<String>,
	pub tx_count: Option<u64>,
}

fn present(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.trim().is_empty())
}

impl GraphPayload {
	/// Normalize into a snapshot focused on `center`. Nodes without an id and
	/// edges without both endpoints are dropped; a missing `tx_count` is 0.
	pub fn into_snapshot(self, center: &str) -> GraphSnapshot {
		let nodes = self
			.nodes
			.into_iter()
			.filter_map(|n| present(n.id).map(GraphNode::new))
			.collect();
		let edges = self
			.edges
			.into_iter()
			.filter_map(|e| {
				let (src, dst) = (present(e.src)?, present(e.dst)?);
				Some(GraphEdge::new(src, dst, e.tx_count.unwrap_or(0)))
			})
			.collect();
		GraphSnapshot::new(nodes, edges, center)
	}
}

/// `GET /entity/{address}/risk`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskProfile {
	pub address: String,
	#[serde(deserialize_with = "lenient")]
	pub risk_score: f64,
	#[serde(deserialize_with = "lenient")]
	pub band: String,
	#[serde(deserialize_with = "lenient")]
	pub labels: Vec<RiskLabel>,
	#[serde(deserialize_with = "lenient")]
	pub factors: RiskFactors,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskLabel {
	#[serde(deserialize_with = "lenient")]
	pub label: String,
	#[serde(deserialize_with = "lenient")]
	pub confidence: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskFactors {
	#[serde(deserialize_with = "lenient")]
	pub label_risk: f64,
	#[serde(deserialize_with = "lenient")]
	pub alert_risk: f64,
	#[serde(deserialize_with = "lenient")]
	pub centrality_risk: f64,
	#[serde(deserialize_with = "lenient")]
	pub flow_risk: f64,
}
