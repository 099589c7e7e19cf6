//! Active configuration store
//!
//! Readers take an `Arc` to a complete snapshot and keep using it for the rest
//! of their request. Publishing swaps the pointer; a snapshot is never changed
//! in place.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::prelude::*;
use crate::status::DeploymentStatus;
use crate::validate::validate;
use edgegate_types::config::{MaintenanceConfig, RawMaintenanceConfig};

#[derive(Debug)]
pub struct ConfigSnapshot {
	pub config: MaintenanceConfig,
	/// Document the config was validated from
	pub raw: RawMaintenanceConfig,
	pub status: DeploymentStatus,
	pub loaded_at: DateTime<Utc>,
}

impl ConfigSnapshot {
	fn new(config: MaintenanceConfig, raw: RawMaintenanceConfig) -> Self {
		let status = DeploymentStatus::derive(&config);
		Self { config, raw, status, loaded_at: Utc::now() }
	}
}

pub struct ConfigStore {
	current: RwLock<Arc<ConfigSnapshot>>,
}

impl ConfigStore {
	/// Store holding the pass-through configuration
	pub fn new() -> Self {
		let snapshot = ConfigSnapshot::new(MaintenanceConfig::default(), RawMaintenanceConfig::default());
		Self { current: RwLock::new(Arc::new(snapshot)) }
	}

	pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
		self.current.read().clone()
	}

	/// Validate and activate a configuration
	///
	/// On rejection the previously active snapshot stays in effect.
	pub fn publish(&self, raw: RawMaintenanceConfig) -> Result<Arc<ConfigSnapshot>, ValidationError> {
		let config = match validate(&raw) {
			Ok(config) => config,
			Err(err) => {
				warn!("Rejected maintenance configuration ({}): {}", err.field(), err);
				return Err(err);
			}
		};

		let snapshot = Arc::new(ConfigSnapshot::new(config, raw));
		*self.current.write() = snapshot.clone();
		info!(
			"Activated maintenance configuration: enabled={} allowlist={} rate_limit={}",
			snapshot.status.maintenance_enabled,
			snapshot.status.allowlist_ruleset_id,
			snapshot.status.rate_limit_ruleset_id
		);
		Ok(snapshot)
	}
}

impl Default for ConfigStore {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_starts_as_pass_through() {
		let store = ConfigStore::new();
		assert!(!store.snapshot().config.enabled);
	}

	#[test]
	fn test_publish_swaps_snapshot() {
		let store = ConfigStore::new();
		let before = store.snapshot();

		let raw = RawMaintenanceConfig { enabled: true, ..Default::default() };
		store.publish(raw.clone()).unwrap();

		assert!(store.snapshot().config.enabled);
		assert_eq!(store.snapshot().raw, raw);
		// Readers holding the old snapshot are unaffected
		assert!(!before.config.enabled);
	}

	#[test]
	fn test_rejected_publish_keeps_previous() {
		let store = ConfigStore::new();
		store
			.publish(RawMaintenanceConfig {
				enabled: true,
				allowed_regions: vec!["GB".into()],
				..Default::default()
			})
			.unwrap();

		let err = store
			.publish(RawMaintenanceConfig {
				enabled: false,
				allowed_regions: vec!["UK1".into()],
				..Default::default()
			})
			.unwrap_err();
		assert!(matches!(err, ValidationError::InvalidRegionCode { .. }));

		let snapshot = store.snapshot();
		assert!(snapshot.config.enabled);
		assert!(snapshot.config.allowed_regions.contains("GB"));
	}

	#[test]
	fn test_concurrent_readers_see_whole_snapshots() {
		let store = ConfigStore::new();
		std::thread::scope(|scope| {
			scope.spawn(|| {
				for i in 0..200 {
					let regions = if i % 2 == 0 { vec!["US".into()] } else { vec!["FR".into(), "DE".into()] };
					let _ = store.publish(RawMaintenanceConfig {
						enabled: i % 2 == 0,
						allowed_regions: regions,
						..Default::default()
					});
				}
			});
			for _ in 0..4 {
				scope.spawn(|| {
					for _ in 0..200 {
						let snapshot = store.snapshot();
						let regions = snapshot.config.allowed_regions.len();
						if snapshot.config.enabled {
							assert_eq!(regions, 1);
						} else {
							assert!(regions == 0 || regions == 2);
						}
					}
				});
			}
		});
	}
}

// vim: ts=4
