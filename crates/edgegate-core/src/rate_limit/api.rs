//! Rate Limiting Internal API
//!
//! Trait and types for programmatic rate limit management.

use chrono::{DateTime, Utc};

use super::extractors::RateKey;
use edgegate_types::config::RateLimitPolicy;

/// Outcome of a single admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
	pub allowed: bool,
	/// Seconds until the key can expect to be admitted again (denials only)
	pub retry_after_seconds: Option<u64>,
}

impl Admission {
	pub fn allow() -> Self {
		Self { allowed: true, retry_after_seconds: None }
	}

	pub fn deny(retry_after_seconds: u64) -> Self {
		Self { allowed: false, retry_after_seconds: Some(retry_after_seconds) }
	}
}

/// Statistics about the rate limiter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimiterStats {
	/// Number of keys with live state
	pub tracked_keys: usize,
	pub total_admitted: u64,
	pub total_denied: u64,
	/// Entries removed by sweeps
	pub total_evicted: u64,
}

/// Internal API for rate limit management
///
/// Implementations are action-agnostic: they only report allow/deny and a
/// retry hint. What a denial means is decided by the caller.
pub trait RateLimitApi: Send + Sync {
	/// Count one request for `key` and decide whether it is admitted
	fn admit(&self, policy: &RateLimitPolicy, key: &RateKey, now: DateTime<Utc>) -> Admission;

	/// Remove entries whose window and mitigation have both elapsed.
	/// Returns the number of removed entries.
	fn sweep(&self, now: DateTime<Utc>) -> usize;

	fn stats(&self) -> RateLimiterStats;
}

// vim: ts=4
