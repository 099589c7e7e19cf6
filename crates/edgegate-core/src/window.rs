//! Maintenance window evaluation

use chrono::{DateTime, Utc};

use edgegate_types::config::{MaintenanceConfig, MaintenanceWindow};

/// Whether maintenance mode is in effect at `now`
///
/// No window means maintenance is on for as long as the config is enabled.
/// A window is closed-open: a request at exactly `end_time` is already past it.
pub fn is_active(config: &MaintenanceConfig, now: DateTime<Utc>) -> bool {
	if !config.enabled {
		return false;
	}
	config.window.as_ref().is_none_or(|window| window_contains(window, now))
}

pub fn window_contains(window: &MaintenanceWindow, now: DateTime<Utc>) -> bool {
	window.start_time <= now && now < window.end_time
}

/// Whole seconds (rounded up) until the window closes, if one is set and still open
pub fn seconds_until_end(config: &MaintenanceConfig, now: DateTime<Utc>) -> Option<u64> {
	let window = config.window.as_ref()?;
	let remaining = window.end_time.signed_duration_since(now);
	if remaining <= chrono::TimeDelta::zero() {
		return None;
	}
	Some(crate::ceil_seconds(remaining))
}


// vim: ts=4
