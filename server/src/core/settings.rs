//! Server settings
//!
//! Server options come from `EDGEGATE_*` environment variables. The maintenance
//! configuration itself is a YAML (or JSON) document on disk.

use std::path::Path;
use std::time::Duration;

use crate::core::app::{AppBuilder, ServerMode};
use crate::prelude::*;
use edgegate_types::config::RawMaintenanceConfig;

/// Read a maintenance configuration document
///
/// Only parses; validation happens when the document is published.
pub fn load_config_file(path: &Path) -> EgResult<RawMaintenanceConfig> {
	let text = std::fs::read_to_string(path)?;
	parse_config(&text)
}

/// Parse a YAML or JSON maintenance configuration document
pub fn parse_config(text: &str) -> EgResult<RawMaintenanceConfig> {
	serde_yaml::from_str(text).map_err(|e| Error::Parse(e.to_string()))
}

fn parse_mode(value: &str) -> EgResult<ServerMode> {
	match value.trim().to_ascii_lowercase().as_str() {
		"standalone" => Ok(ServerMode::Standalone),
		"proxy" => Ok(ServerMode::Proxy),
		other => Err(Error::ConfigError(format!("EDGEGATE_MODE: unknown mode '{}'", other))),
	}
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> EgResult<T> {
	value
		.trim()
		.parse()
		.map_err(|_| Error::ConfigError(format!("{}: '{}' is not a valid number", name, value)))
}

/// Apply environment settings to a builder
///
/// `lookup` resolves a variable name; pass `|name| std::env::var(name).ok()`
/// for the process environment.
pub fn apply_env<F>(builder: &mut AppBuilder, lookup: F) -> EgResult<()>
where
	F: Fn(&str) -> Option<String>,
{
	let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

	if let Some(listen) = get("EDGEGATE_LISTEN") {
		builder.listen(listen);
	}
	if let Some(origin) = get("EDGEGATE_ORIGIN") {
		builder.origin(origin);
	}
	if let Some(timeout) = get("EDGEGATE_ORIGIN_TIMEOUT_SECS") {
		builder.origin_timeout(Duration::from_secs(parse_number("EDGEGATE_ORIGIN_TIMEOUT_SECS", &timeout)?));
	}
	if let Some(path) = get("EDGEGATE_CONFIG") {
		builder.config_path(Path::new(&path));
	}
	if let Some(mode) = get("EDGEGATE_MODE") {
		builder.mode(parse_mode(&mode)?);
	}
	if let Some(key) = get("EDGEGATE_ADMIN_KEY") {
		builder.admin_key(key);
	}
	if let Some(header) = get("EDGEGATE_REGION_HEADER") {
		builder.region_header(header.trim().to_ascii_lowercase());
	}

	let mut limiter = builder.opts().limiter.clone();
	if let Some(max) = get("EDGEGATE_MAX_TRACKED_KEYS") {
		limiter.max_tracked_keys = parse_number("EDGEGATE_MAX_TRACKED_KEYS", &max)?;
	}
	builder.limiter(limiter);

	if let Some(secs) = get("EDGEGATE_SWEEP_INTERVAL_SECS") {
		builder.sweep_interval(Duration::from_secs(parse_number("EDGEGATE_SWEEP_INTERVAL_SECS", &secs)?));
	}

	Ok(())
}


// vim: ts=4
