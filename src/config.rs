//! Dashboard configuration: defaults plus overrides from the page query string.

use log::warn;

use crate::components::force_graph::LayoutMode;

/// Addresses tried in order by the "Load known" button.
const KNOWN_ADDRESSES: &[&str] = &[
	"0x4200000000000000000000000000000000000010",
	"0x4200000000000000000000000000000000000007",
	"0x4200000000000000000000000000000000000011",
];

/// Runtime settings for the dashboard.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
	/// Prefix joined in front of every API path. Empty means same origin.
	pub api_base: String,
	pub hot_limit: u32,
	pub failure_limit: u32,
	pub neighbor_limit: u32,
	pub global_limit: u32,
	/// Auto-refresh period; 0 disables the timer.
	pub refresh_interval_secs: u32,
	pub layout_mode: LayoutMode,
	pub known_addresses: Vec<String>,
}

impl Default for DashboardConfig {
	fn default() -> Self {
		Self {
			api_base: String::new(),
			hot_limit: 20,
			failure_limit: 20,
			neighbor_limit: 40,
			global_limit: 80,
			refresh_interval_secs: 60,
			layout_mode: LayoutMode::Force,
			known_addresses: KNOWN_ADDRESSES.iter().map(|a| a.to_string()).collect(),
		}
	}
}

impl DashboardConfig {
	/// Build the config from the current page URL, falling back to defaults.
	pub fn from_location() -> Self {
		let mut config = Self::default();
		let Some(href) = web_sys::window().and_then(|w| w.location().href().ok()) else {
			return config;
		};
		let Ok(url) = web_sys::Url::new(&href) else {
			return config;
		};
		let params = url.search_params();
		for key in [
			"api",
			"hot_limit",
			"failure_limit",
			"neighbors",
			"global",
			"refresh",
			"mode",
			"known",
		] {
			if let Some(value) = params.get(key) {
				config.apply_override(key, &value);
			}
		}
		config
	}

	/// Apply a single `key=value` override. Unknown keys and bad values are ignored.
	pub fn apply_override(&mut self, key: &str, value: &str) {
		let value = value.trim();
		match key {
			"api" => self.api_base = value.trim_end_matches('/').to_string(),
			"hot_limit" => set_limit(&mut self.hot_limit, key, value),
			"failure_limit" => set_limit(&mut self.failure_limit, key, value),
			"neighbors" => set_limit(&mut self.neighbor_limit, key, value),
			"global" => set_limit(&mut self.global_limit, key, value),
			"refresh" => match value.parse() {
				Ok(secs) => self.refresh_interval_secs = secs,
				Err(_) => warn!("ignoring refresh={value:?}: not a number of seconds"),
			},
			"mode" => match LayoutMode::parse(value) {
				Some(mode) => self.layout_mode = mode,
				None => warn!("ignoring mode={value:?}: expected force or radial"),
			},
			"known" => {
				let known: Vec<String> = value
					.split(',')
					.map(str::trim)
					.filter(|a| !a.is_empty())
					.map(String::from)
					.collect();
				if known.is_empty() {
					warn!("ignoring empty known= override");
				} else {
					self.known_addresses = known;
				}
			}
			_ => warn!("ignoring unknown config key {key:?}"),
		}
	}
}

fn set_limit(slot: &mut u32, key: &str, value: &str) {
	match value.parse::<u32>() {
		Ok(n) if n > 0 => *slot = n,
		_ => warn!("ignoring {key}={value:?}: expected a positive integer"),
	}
}
