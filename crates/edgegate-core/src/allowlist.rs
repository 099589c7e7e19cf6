//! Allowlist matching
//!
//! IP, region and path lists are independent: matching any one of them exempts
//! the request. A source IP that does not parse never matches.

use std::net::IpAddr;

use edgegate_types::config::MaintenanceConfig;
use edgegate_types::request::Request;

pub fn is_exempt(config: &MaintenanceConfig, request: &Request) -> bool {
	ip_allowed(config, &request.source_ip)
		|| request.region.as_deref().is_some_and(|region| region_allowed(config, region))
		|| path_allowed(config, &request.path)
}

/// Address family must match; `IpNet::contains` never crosses v4/v6
pub fn ip_allowed(config: &MaintenanceConfig, source_ip: &str) -> bool {
	if config.allowed_ips.is_empty() {
		return false;
	}
	let Ok(addr) = source_ip.trim().parse::<IpAddr>() else {
		return false;
	};
	config.allowed_ips.iter().any(|net| net.contains(&addr))
}

pub fn region_allowed(config: &MaintenanceConfig, region: &str) -> bool {
	let region = region.trim();
	if region.len() != 2 {
		return false;
	}
	config.allowed_regions.contains(region.to_ascii_uppercase().as_str())
}

pub fn path_allowed(config: &MaintenanceConfig, path: &str) -> bool {
	config.allowed_paths.iter().any(|pattern| pattern.is_match(path))
}


// vim: ts=4
