//! Deployment status
//!
//! Read-only facts derived from the active configuration, for whatever deployed
//! it. Nothing here feeds back into request decisions.

use serde::Serialize;
use sha2::{Digest, Sha256};

use edgegate_types::config::MaintenanceConfig;

/// Reported in place of a ruleset id when no such ruleset exists
pub const NO_RULESET: &str = "none-created";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStatus {
	pub start_time: String,
	pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatus {
	pub maintenance_enabled: bool,
	pub route_pattern: Box<str>,
	pub allowlist_ruleset_id: Box<str>,
	pub rate_limit_ruleset_id: Box<str>,
	pub rate_limit_enabled: bool,
	pub maintenance_window: Option<WindowStatus>,
}

impl DeploymentStatus {
	pub fn derive(config: &MaintenanceConfig) -> Self {
		Self {
			maintenance_enabled: config.enabled,
			route_pattern: config.route_pattern.clone(),
			allowlist_ruleset_id: allowlist_ruleset_id(config),
			rate_limit_ruleset_id: config.rate_limit.as_ref().map_or_else(
				|| NO_RULESET.into(),
				|policy| {
					ruleset_id(
						"ratelimit",
						&[format!(
							"{}|{}|{}|{}",
							policy.requests_per_period,
							policy.period_seconds,
							policy.action,
							policy.mitigation_timeout_seconds
						)],
					)
				},
			),
			rate_limit_enabled: config.active_rate_limit().is_some(),
			maintenance_window: config.window.as_ref().map(|window| WindowStatus {
				start_time: window.start_time.to_rfc3339(),
				end_time: window.end_time.to_rfc3339(),
			}),
		}
	}
}

fn allowlist_ruleset_id(config: &MaintenanceConfig) -> Box<str> {
	let mut entries: Vec<String> = config
		.allowed_ips
		.iter()
		.map(|net| format!("ip:{}", net))
		.chain(config.allowed_regions.iter().map(|region| format!("region:{}", region)))
		.chain(config.allowed_paths.iter().map(|pattern| format!("path:{}", pattern.as_str())))
		.collect();
	if entries.is_empty() {
		return NO_RULESET.into();
	}
	entries.sort();
	entries.dedup();
	ruleset_id("allow", &entries)
}

/// Content-derived id: identical rules give identical ids across deploys
fn ruleset_id(prefix: &str, entries: &[String]) -> Box<str> {
	let mut hasher = Sha256::new();
	for entry in entries {
		hasher.update(entry.as_bytes());
		hasher.update([0u8]);
	}
	let digest = hasher.finalize();
	let hex: String = digest.iter().take(6).map(|b| format!("{:02x}", b)).collect();
	format!("{}-{}", prefix, hex).into()
}


// vim: ts=4
