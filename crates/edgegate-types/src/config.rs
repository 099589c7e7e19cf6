//! Maintenance configuration model
//!
//! `RawMaintenanceConfig` is the document delivered by the deployment side
//! (camelCase keys, YAML or JSON). It is only ever turned into a
//! `MaintenanceConfig` by the validator; the validated form is immutable and
//! replaced wholesale on every redeploy.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use ipnet::IpNet;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Rate limit periods below this are rejected, never clamped
pub const MIN_PERIOD_SECONDS: u64 = 10;
pub const DEFAULT_TITLE: &str = "Maintenance Mode";
pub const DEFAULT_MESSAGE: &str =
	"We are currently performing scheduled maintenance. We will be back shortly.";
pub const DEFAULT_RETRY_AFTER_SECONDS: u64 = 3600;
pub const DEFAULT_ROUTE_PATTERN: &str = "*";

// Raw (wire) form
//*****************

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaintenanceConfig {
	#[serde(default)]
	pub enabled: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub contact_email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub custom_css: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub logo_url: Option<String>,
	#[serde(default)]
	pub allowed_ips: Vec<String>,
	#[serde(default)]
	pub allowed_regions: Vec<String>,
	#[serde(default)]
	pub allowed_paths: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub window: Option<RawMaintenanceWindow>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rate_limit: Option<RawRateLimitPolicy>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub route_pattern: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub retry_after_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaintenanceWindow {
	pub start_time: String,
	pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRateLimitPolicy {
	#[serde(default)]
	pub enabled: bool,
	pub requests_per_period: u64,
	pub period_seconds: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<String>,
	#[serde(default)]
	pub mitigation_timeout_seconds: u64,
}

// Validated form
//****************

/// What happens to a key once it exceeds its quota
///
/// The limiter itself never looks at this; only the decision layer does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitAction {
	Block,
	Challenge,
	JsChallenge,
	ManagedChallenge,
	/// Count and log, but do not enforce
	Log,
}

impl RateLimitAction {
	pub const ALL: [RateLimitAction; 5] = [
		RateLimitAction::Block,
		RateLimitAction::Challenge,
		RateLimitAction::JsChallenge,
		RateLimitAction::ManagedChallenge,
		RateLimitAction::Log,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			RateLimitAction::Block => "block",
			RateLimitAction::Challenge => "challenge",
			RateLimitAction::JsChallenge => "js_challenge",
			RateLimitAction::ManagedChallenge => "managed_challenge",
			RateLimitAction::Log => "log",
		}
	}

	/// Parse a configured action name (case-insensitive)
	pub fn parse(value: &str) -> Option<Self> {
		let value = value.trim();
		Self::ALL.into_iter().find(|action| action.as_str().eq_ignore_ascii_case(value))
	}

	pub fn is_challenge(&self) -> bool {
		matches!(
			self,
			RateLimitAction::Challenge
				| RateLimitAction::JsChallenge
				| RateLimitAction::ManagedChallenge
		)
	}

	pub fn is_enforced(&self) -> bool {
		!matches!(self, RateLimitAction::Log)
	}
}

impl std::fmt::Display for RateLimitAction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Scheduled interval `[start_time, end_time)` in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceWindow {
	pub start_time: DateTime<Utc>,
	pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
	pub enabled: bool,
	pub requests_per_period: u64,
	pub period_seconds: u64,
	pub action: RateLimitAction,
	pub mitigation_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct MaintenanceConfig {
	pub enabled: bool,
	pub title: Box<str>,
	pub message: Box<str>,
	pub contact_email: Option<Box<str>>,
	pub custom_css: Option<Box<str>>,
	pub logo_url: Option<Box<str>>,
	/// Literals are stored as /32 or /128 networks
	pub allowed_ips: Vec<IpNet>,
	/// Upper-case alpha-2 codes
	pub allowed_regions: BTreeSet<Box<str>>,
	pub allowed_paths: Vec<Regex>,
	pub window: Option<MaintenanceWindow>,
	pub rate_limit: Option<RateLimitPolicy>,
	pub route_pattern: Box<str>,
	pub retry_after_seconds: Option<u64>,
}

impl MaintenanceConfig {
	/// Policy that is actually enforced, if any
	pub fn active_rate_limit(&self) -> Option<&RateLimitPolicy> {
		self.rate_limit.as_ref().filter(|policy| policy.enabled)
	}
}

impl Default for MaintenanceConfig {
	/// Fully inert pass-through configuration
	fn default() -> Self {
		Self {
			enabled: false,
			title: DEFAULT_TITLE.into(),
			message: DEFAULT_MESSAGE.into(),
			contact_email: None,
			custom_css: None,
			logo_url: None,
			allowed_ips: Vec::new(),
			allowed_regions: BTreeSet::new(),
			allowed_paths: Vec::new(),
			window: None,
			rate_limit: None,
			route_pattern: DEFAULT_ROUTE_PATTERN.into(),
			retry_after_seconds: Some(DEFAULT_RETRY_AFTER_SECONDS),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_action_parse() {
		assert_eq!(RateLimitAction::parse("block"), Some(RateLimitAction::Block));
		assert_eq!(RateLimitAction::parse("Managed_Challenge"), Some(RateLimitAction::ManagedChallenge));
		assert_eq!(RateLimitAction::parse("ban"), None);
		assert_eq!(RateLimitAction::parse(""), None);
	}

	#[test]
	fn test_action_kinds() {
		assert!(RateLimitAction::JsChallenge.is_challenge());
		assert!(!RateLimitAction::Block.is_challenge());
		assert!(!RateLimitAction::Log.is_enforced());
		assert!(RateLimitAction::Block.is_enforced());
	}

	#[test]
	fn test_raw_config_camel_case() {
		let raw: RawMaintenanceConfig = serde_json::from_value(serde_json::json!({
			"enabled": true,
			"allowedRegions": ["US"],
			"rateLimit": {
				"enabled": true,
				"requestsPerPeriod": 100,
				"periodSeconds": 60,
				"action": "block",
				"mitigationTimeoutSeconds": 600
			}
		}))
		.unwrap();

		assert!(raw.enabled);
		assert_eq!(raw.allowed_regions, vec!["US".to_string()]);
		let rate_limit = raw.rate_limit.unwrap();
		assert_eq!(rate_limit.requests_per_period, 100);
		assert_eq!(rate_limit.mitigation_timeout_seconds, 600);
	}

	#[test]
	fn test_default_is_inert() {
		let config = MaintenanceConfig::default();
		assert!(!config.enabled);
		assert!(config.active_rate_limit().is_none());
	}
}

// vim: ts=4
