//! Small text helpers shared by the panels.

use serde_json::Value;

/// Shorten an address to `0xabcd…wxyz`. Short ids are returned unchanged.
pub fn short_addr(address: &str) -> String {
	let chars: Vec<char> = address.chars().collect();
	if chars.len() <= 10 {
		return address.to_string();
	}
	let head: String = chars[..6].iter().collect();
	let tail: String = chars[chars.len() - 4..].iter().collect();
	format!("{head}…{tail}")
}

/// Cut a message to at most `max` characters.
pub fn truncate(message: &str, max: usize) -> String {
	message.chars().take(max).collect()
}

/// Render an optional scalar the backend may send as a number or a string.
pub fn value_or_na(value: Option<&Value>) -> String {
	match value {
		None | Some(Value::Null) => "n/a".to_string(),
		Some(Value::String(s)) => s.clone(),
		Some(other) => other.to_string(),
	}
}

/// CSS class for a severity badge.
pub fn severity_class(severity: &str) -> &'static str {
	match severity {
		"high" => "high",
		"medium" => "medium",
		_ => "low",
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn short_addr_keeps_head_and_tail() {
		assert_eq!(
			short_addr("0x4200000000000000000000000000000000000010"),
			"0x4200…0010"
		);
		assert_eq!(short_addr("0xAAA"), "0xAAA");
		assert_eq!(short_addr(""), "");
	}

	#[test]
	fn truncate_counts_chars() {
		assert_eq!(truncate("héllo", 2), "hé");
		assert_eq!(truncate("ok", 140), "ok");
	}

	#[test]
	fn value_or_na_defaults() {
		assert_eq!(value_or_na(None), "n/a");
		assert_eq!(value_or_na(Some(&Value::Null)), "n/a");
		assert_eq!(value_or_na(Some(&json!("low"))), "low");
		assert_eq!(value_or_na(Some(&json!(12))), "12");
	}

	#[test]
	fn unknown_severity_is_low() {
		assert_eq!(severity_class("high"), "high");
		assert_eq!(severity_class("critical"), "low");
	}
}
