//! Client for the monitoring API.
//!
//! [`ApiClient`] owns endpoint paths and response decoding; the network hop
//! itself sits behind [`Transport`] so the browser `fetch` implementation can
//! be swapped for an in-memory one in tests.

mod error;
mod fetch;
pub mod types;

use log::debug;
use serde::de::DeserializeOwned;

pub use error::{ApiError, Result};
pub use fetch::FetchTransport;
use types::{
	DashboardSummary, FailureEntry, FailuresPage, GraphPayload, RiskProfile, Taxonomy,
	TaxonomyPayload,
};

use crate::components::force_graph::GraphSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	Get,
	Post,
}

impl Method {
	pub fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}

/// Status and body text of a completed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
	pub status: u16,
	pub body: String,
}

impl RawResponse {
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// One HTTP round trip. Implementations report transport failures as
/// [`ApiError::Network`] and return every completed response as-is.
#[allow(async_fn_in_trait)]
pub trait Transport {
	async fn send(&self, method: Method, path: &str) -> Result<RawResponse>;
}

/// Typed access to the monitoring endpoints.
#[derive(Clone)]
pub struct ApiClient<T> {
	transport: T,
}

impl<T: Transport> ApiClient<T> {
	pub fn new(transport: T) -> Self {
		Self { transport }
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	async fn request(&self, method: Method, path: &str) -> Result<String> {
		debug!("{} {path}", method.as_str());
		let response = self.transport.send(method, path).await?;
		if !response.is_success() {
			return Err(ApiError::Http {
				path: path.to_string(),
				status: response.status,
				body: response.body,
			});
		}
		Ok(response.body)
	}

	async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
		let body = self.request(Method::Get, path).await?;
		serde_json::from_str(&body).map_err(|source| ApiError::Decode {
			path: path.to_string(),
			source,
		})
	}

	/// POST without a body; any 2xx response counts as success.
	pub async fn post(&self, path: &str) -> Result<()> {
		self.request(Method::Post, path).await.map(|_| ())
	}

	pub async fn summary(&self, hot_limit: u32) -> Result<DashboardSummary> {
		self.get_json(&format!("/dashboard/summary?hot_limit={hot_limit}"))
			.await
	}

	pub async fn failures(&self, limit: u32) -> Result<Vec<FailureEntry>> {
		let page: FailuresPage = self
			.get_json(&format!("/runbook/failures?limit={limit}"))
			.await?;
		Ok(page.failures)
	}

	pub async fn taxonomy(&self) -> Result<Taxonomy> {
		let payload: TaxonomyPayload = self.get_json("/labels/taxonomy").await?;
		Ok(payload.into_taxonomy())
	}

	/// Ego-graph around `address`, focused on it.
	pub async fn neighbors(&self, address: &str, limit: u32) -> Result<GraphSnapshot> {
		let payload: GraphPayload = self
			.get_json(&format!("/graph/neighbors/{address}?limit={limit}"))
			.await?;
		Ok(payload.into_snapshot(address))
	}

	/// Unfocused relationship sample.
	pub async fn global_graph(&self, limit: u32) -> Result<GraphSnapshot> {
		let payload: GraphPayload = self
			.get_json(&format!("/graph/global?limit={limit}"))
			.await?;
		Ok(payload.into_snapshot(""))
	}

	pub async fn risk(&self, address: &str) -> Result<RiskProfile> {
		self.get_json(&format!("/entity/{address}/risk")).await
	}
}


#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::mock::MockTransport;
	use super::*;
	use crate::components::force_graph::{GraphEdge, GraphNode};

	#[test]
	fn non_success_carries_body_text() {
		let mock = MockTransport::default();
		mock.respond(Method::Post, "/alerts/42/ack?assignee=ui", 500, "db down");
		let client = ApiClient::new(mock.clone());

		let err = block_on(client.post("/alerts/42/ack?assignee=ui")).unwrap_err();
		assert_eq!(err.to_string(), "/alerts/42/ack?assignee=ui -> 500 db down");
		assert_eq!(mock.requests(), vec!["POST /alerts/42/ack?assignee=ui"]);
	}

	#[test]
	fn neighbors_focuses_on_requested_address() {
		let mock = MockTransport::default();
		mock.respond(
			Method::Get,
			"/graph/neighbors/0xAAA?limit=40",
			200,
			r#"{"nodes":[{"id":"0xAAA"},{"id":"0xBBB"},{"id":"0xCCC"}],
			   "edges":[{"src":"0xAAA","dst":"0xBBB","tx_count":5},
			            {"src":"0xAAA","dst":"0xCCC","tx_count":0}]}"#,
		);
		let client = ApiClient::new(mock);
		let snap = block_on(client.neighbors("0xAAA", 40)).unwrap();
		assert_eq!(snap.center, "0xaaa");
		assert_eq!(snap.nodes[2], GraphNode::new("0xCCC"));
		assert_eq!(snap.edges[0], GraphEdge::new("0xAAA", "0xBBB", 5));
	}

	#[test]
	fn global_graph_is_unfocused() {
		let mock = MockTransport::default();
		mock.respond(Method::Get, "/graph/global?limit=80", 200, r#"{"nodes":[],"edges":[]}"#);
		let client = ApiClient::new(mock);
		let snap = block_on(client.global_graph(80)).unwrap();
		assert!(!snap.has_focus());
	}

	#[test]
	fn undecodable_body_is_a_decode_error() {
		let mock = MockTransport::default();
		mock.respond(Method::Get, "/labels/taxonomy", 200, "<html>");
		let client = ApiClient::new(mock);
		let err = block_on(client.taxonomy()).unwrap_err();
		assert!(matches!(err, ApiError::Decode { .. }));
	}

	#[test]
	fn failures_unwraps_page() {
		let mock = MockTransport::default();
		mock.respond(
			Method::Get,
			"/runbook/failures?limit=20",
			200,
			r#"{"limit":20,"summary":{"open":1},"failures":[{"id":7,"start_block":10,"retry_count":2,"status":"open","error":null}]}"#,
		);
		let client = ApiClient::new(mock);
		let failures = block_on(client.failures(20)).unwrap();
		assert_eq!(failures.len(), 1);
		assert_eq!((failures[0].id, failures[0].start_block, failures[0].end_block), (7, Some(10), None));
		assert_eq!(failures[0].error, "");
	}
}
