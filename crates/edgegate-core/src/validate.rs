//! Configuration validation
//!
//! Runs once per deploy, never per request. A rejected document never becomes
//! active; see [`crate::store::ConfigStore`] for how the previous one is kept.

use std::collections::BTreeSet;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use ipnet::IpNet;
use regex::Regex;

use crate::prelude::*;
use crate::region::canonical_region;
use edgegate_types::config::{
	MaintenanceConfig, MaintenanceWindow, RateLimitAction, RateLimitPolicy, RawMaintenanceConfig,
	RawMaintenanceWindow, RawRateLimitPolicy, DEFAULT_MESSAGE, DEFAULT_RETRY_AFTER_SECONDS,
	DEFAULT_ROUTE_PATTERN, DEFAULT_TITLE, MIN_PERIOD_SECONDS,
};

/// Validate a raw configuration document
pub fn validate(raw: &RawMaintenanceConfig) -> Result<MaintenanceConfig, ValidationError> {
	let rate_limit = raw.rate_limit.as_ref().map(validate_rate_limit).transpose()?;
	let allowed_regions = validate_regions(&raw.allowed_regions)?;
	let allowed_ips = raw.allowed_ips.iter().map(|ip| parse_ip_entry(ip)).collect::<Result<_, _>>()?;
	let window = raw.window.as_ref().map(validate_window).transpose()?;
	let allowed_paths = raw
		.allowed_paths
		.iter()
		.map(|pattern| {
			Regex::new(pattern).map_err(|e| ValidationError::InvalidPathPattern {
				value: pattern.as_str().into(),
				reason: e.to_string().into(),
			})
		})
		.collect::<Result<_, _>>()?;
	let logo_url = raw.logo_url.as_deref().map(validate_logo_url).transpose()?;

	Ok(MaintenanceConfig {
		enabled: raw.enabled,
		title: non_empty(raw.title.as_deref()).unwrap_or(DEFAULT_TITLE).into(),
		message: non_empty(raw.message.as_deref()).unwrap_or(DEFAULT_MESSAGE).into(),
		contact_email: non_empty(raw.contact_email.as_deref()).map(Into::into),
		custom_css: non_empty(raw.custom_css.as_deref()).map(Into::into),
		logo_url,
		allowed_ips,
		allowed_regions,
		allowed_paths,
		window,
		rate_limit,
		route_pattern: non_empty(raw.route_pattern.as_deref())
			.unwrap_or(DEFAULT_ROUTE_PATTERN)
			.into(),
		retry_after_seconds: Some(raw.retry_after_seconds.unwrap_or(DEFAULT_RETRY_AFTER_SECONDS)),
	})
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|v| !v.is_empty())
}

fn validate_rate_limit(raw: &RawRateLimitPolicy) -> Result<RateLimitPolicy, ValidationError> {
	let action = match raw.action.as_deref() {
		Some(value) => RateLimitAction::parse(value)
			.ok_or_else(|| ValidationError::InvalidRateLimitAction { value: value.into() })?,
		None => RateLimitAction::Block,
	};

	// A disabled policy may carry placeholder numbers
	if raw.enabled {
		if raw.period_seconds < MIN_PERIOD_SECONDS {
			return Err(ValidationError::RateLimitPeriodTooLow {
				value: raw.period_seconds,
				min: MIN_PERIOD_SECONDS,
			});
		}
		if raw.requests_per_period == 0 {
			return Err(ValidationError::InvalidRateLimitQuota { value: raw.requests_per_period });
		}
	}

	Ok(RateLimitPolicy {
		enabled: raw.enabled,
		requests_per_period: raw.requests_per_period,
		period_seconds: raw.period_seconds,
		action,
		mitigation_timeout_seconds: raw.mitigation_timeout_seconds,
	})
}

fn validate_regions(regions: &[String]) -> Result<BTreeSet<Box<str>>, ValidationError> {
	regions
		.iter()
		.map(|code| {
			canonical_region(code)
				.map(Into::into)
				.ok_or_else(|| ValidationError::InvalidRegionCode { value: code.as_str().into() })
		})
		.collect()
}

/// Parse an address literal or CIDR block; literals become host networks
pub fn parse_ip_entry(entry: &str) -> Result<IpNet, ValidationError> {
	let trimmed = entry.trim();
	if let Ok(net) = trimmed.parse::<IpNet>() {
		return Ok(net.trunc());
	}
	trimmed
		.parse::<IpAddr>()
		.map(IpNet::from)
		.map_err(|_| ValidationError::InvalidIpLiteral { value: entry.into() })
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
	DateTime::parse_from_rfc3339(value.trim())
		.map(|ts| ts.with_timezone(&Utc))
		.map_err(|_| ValidationError::InvalidTimestamp { field, value: value.into() })
}

fn validate_window(raw: &RawMaintenanceWindow) -> Result<MaintenanceWindow, ValidationError> {
	let start_time = parse_timestamp("window.startTime", &raw.start_time)?;
	let end_time = parse_timestamp("window.endTime", &raw.end_time)?;
	if start_time >= end_time {
		return Err(ValidationError::InvalidWindowOrdering {
			start: raw.start_time.as_str().into(),
			end: raw.end_time.as_str().into(),
		});
	}
	Ok(MaintenanceWindow { start_time, end_time })
}

fn validate_logo_url(value: &str) -> Result<Box<str>, ValidationError> {
	match url::Url::parse(value.trim()) {
		Ok(parsed) if parsed.scheme() == "https" && parsed.host_str().is_some() => {
			Ok(parsed.as_str().into())
		}
		_ => Err(ValidationError::InvalidLogoUrl { value: value.into() }),
	}
}


// vim: ts=4
