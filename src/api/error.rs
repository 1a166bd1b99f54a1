//! Error types for calls against the monitoring API.

use thiserror::Error;

/// A specialized `Result` type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Every way a request can fail. All variants are handled the same way by
/// the action guard: abort, mark the dashboard degraded, show the message.
#[derive(Error, Debug)]
pub enum ApiError {
	/// The request never produced a response (offline, CORS, no window).
	#[error("network error: {0}")]
	Network(String),

	/// The server answered with a non-2xx status.
	#[error("{path} -> {status} {body}")]
	Http {
		path: String,
		status: u16,
		body: String,
	},

	/// A 2xx body that is not the expected JSON.
	#[error("{path}: invalid response: {source}")]
	Decode {
		path: String,
		#[source]
		source: serde_json::Error,
	},
}

impl ApiError {
	pub fn status(&self) -> Option<u16> {
		match self {
			ApiError::Http { status, .. } => Some(*status),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let http = ApiError::Http {
			path: "/alerts/42/ack?assignee=ui".into(),
			status: 500,
			body: "boom".into(),
		};
		assert_eq!(http.to_string(), "/alerts/42/ack?assignee=ui -> 500 boom");
		assert_eq!(http.status(), Some(500));

		let network = ApiError::Network("offline".into());
		assert_eq!(network.to_string(), "network error: offline");
		assert_eq!(network.status(), None);

		let source = serde_json::from_str::<u32>("nope").unwrap_err();
		let decode = ApiError::Decode {
			path: "/labels/taxonomy".into(),
			source,
		};
		assert!(decode.to_string().starts_with("/labels/taxonomy: invalid response"));
	}
}
