//! Rate Limit Manager
//!
//! Fixed-window counter per key. Each key owns its own mutex, so the
//! read-modify-write of one key never waits on another key. Entries live in a
//! sharded map; lookups, inserts and sweeps lock a single shard at a time.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::api::{Admission, RateLimitApi, RateLimiterStats};
use super::config::LimiterConfig;
use super::extractors::RateKey;
use crate::ceil_seconds;
use edgegate_types::config::RateLimitPolicy;

fn seconds(secs: u64) -> TimeDelta {
	i64::try_from(secs).ok().and_then(TimeDelta::try_seconds).unwrap_or(TimeDelta::MAX)
}

fn add(ts: DateTime<Utc>, delta: TimeDelta) -> DateTime<Utc> {
	ts.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Mutable per-key counter
#[derive(Debug, Clone)]
struct RateLimitState {
	window_start: DateTime<Utc>,
	count: u64,
	mitigated_until: Option<DateTime<Utc>>,
	/// Point after which both the window and any mitigation have elapsed
	expires_at: DateTime<Utc>,
}

impl RateLimitState {
	fn new(now: DateTime<Utc>) -> Self {
		Self { window_start: now, count: 0, mitigated_until: None, expires_at: now }
	}

	fn apply(&mut self, policy: &RateLimitPolicy, now: DateTime<Utc>) -> Admission {
		let period = seconds(policy.period_seconds);

		if now.signed_duration_since(self.window_start) >= period {
			self.window_start = now;
			self.count = 0;
			if self.mitigated_until.is_some_and(|until| until <= now) {
				self.mitigated_until = None;
			}
		}
		let window_end = add(self.window_start, period);

		let admission = if let Some(until) = self.mitigated_until.filter(|until| now < *until) {
			Admission::deny(ceil_seconds(until.signed_duration_since(now)))
		} else {
			self.count = self.count.saturating_add(1);
			if self.count > policy.requests_per_period {
				let until = add(now, seconds(policy.mitigation_timeout_seconds));
				self.mitigated_until = Some(until);
				// A retry before the counting window closes would just be denied again
				Admission::deny(ceil_seconds(until.max(window_end).signed_duration_since(now)))
			} else {
				Admission::allow()
			}
		};

		self.expires_at = self.mitigated_until.map_or(window_end, |until| until.max(window_end));
		admission
	}

	fn is_expired(&self, now: DateTime<Utc>) -> bool {
		self.expires_at <= now
	}
}

type Entry = Arc<Mutex<RateLimitState>>;

/// Shard count of the entry map, a power of two
const SHARDS: usize = 256;

/// Main rate limit manager
pub struct RateLimitManager {
	config: LimiterConfig,
	entries: DashMap<RateKey, Entry>,
	/// Admission counter driving the periodic sweep
	admissions: AtomicU64,
	/// Unix second of the last capacity-triggered sweep
	last_pressure_sweep: AtomicI64,
	total_admitted: AtomicU64,
	total_denied: AtomicU64,
	total_evicted: AtomicU64,
}

impl RateLimitManager {
	pub fn new(config: LimiterConfig) -> Self {
		Self {
			config,
			entries: DashMap::with_shard_amount(SHARDS),
			admissions: AtomicU64::new(0),
			last_pressure_sweep: AtomicI64::new(i64::MIN),
			total_admitted: AtomicU64::new(0),
			total_denied: AtomicU64::new(0),
			total_evicted: AtomicU64::new(0),
		}
	}

	fn entry(&self, key: &RateKey, now: DateTime<Utc>) -> Entry {
		if let Some(entry) = self.entries.get(key) {
			return entry.value().clone();
		}
		self.entries
			.entry(key.clone())
			.or_insert_with(|| Arc::new(Mutex::new(RateLimitState::new(now))))
			.clone()
	}

	fn maybe_sweep(&self, now: DateTime<Utc>) {
		let count = self.admissions.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
		let periodic = self.config.sweep_every > 0 && count % self.config.sweep_every == 0;

		let mut pressure = false;
		if !periodic && self.entries.len() >= self.config.max_tracked_keys {
			// At most one capacity-triggered sweep per second
			let second = now.timestamp();
			let last = self.last_pressure_sweep.load(Ordering::Relaxed);
			pressure = second > last
				&& self
					.last_pressure_sweep
					.compare_exchange(last, second, Ordering::Relaxed, Ordering::Relaxed)
					.is_ok();
		}

		if periodic || pressure {
			self.sweep(now);
			let tracked = self.entries.len();
			if tracked >= self.config.max_tracked_keys {
				warn!(
					"Rate limiter tracks {} keys (soft limit {}), no expired entries left",
					tracked, self.config.max_tracked_keys
				);
			}
		}
	}
}

impl Default for RateLimitManager {
	fn default() -> Self {
		Self::new(LimiterConfig::default())
	}
}

impl RateLimitApi for RateLimitManager {
	fn admit(&self, policy: &RateLimitPolicy, key: &RateKey, now: DateTime<Utc>) -> Admission {
		let entry = self.entry(key, now);
		let admission = entry.lock().apply(policy, now);
		drop(entry);

		if admission.allowed {
			self.total_admitted.fetch_add(1, Ordering::Relaxed);
		} else {
			self.total_denied.fetch_add(1, Ordering::Relaxed);
			debug!(
				"Rate limited {} (retry after {:?}s)",
				key.label(),
				admission.retry_after_seconds
			);
		}

		self.maybe_sweep(now);
		admission
	}

	fn sweep(&self, now: DateTime<Utc>) -> usize {
		let mut removed = 0;
		// Holding a shard's write lock keeps anyone from cloning an entry out of it,
		// so an Arc held only by the map cannot be in use. Locked entries are in use.
		self.entries.retain(|_, entry| {
			let expired = Arc::strong_count(entry) == 1
				&& entry.try_lock().is_some_and(|state| state.is_expired(now));
			if expired {
				removed += 1;
			}
			!expired
		});

		if removed > 0 {
			self.total_evicted.fetch_add(removed as u64, Ordering::Relaxed);
			debug!("Rate limiter sweep evicted {} entries", removed);
		}
		removed
	}

	fn stats(&self) -> RateLimiterStats {
		RateLimiterStats {
			tracked_keys: self.entries.len(),
			total_admitted: self.total_admitted.load(Ordering::Relaxed),
			total_denied: self.total_denied.load(Ordering::Relaxed),
			total_evicted: self.total_evicted.load(Ordering::Relaxed),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use edgegate_types::config::RateLimitAction;

	fn policy(requests: u64, period: u64, timeout: u64) -> RateLimitPolicy {
		RateLimitPolicy {
			enabled: true,
			requests_per_period: requests,
			period_seconds: period,
			action: RateLimitAction::Block,
			mitigation_timeout_seconds: timeout,
		}
	}

	fn t0() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
	}

	fn key(ip: &str) -> RateKey {
		RateKey::from_source(ip)
	}

	#[test]
	fn test_first_n_admitted_then_denied() {
		let manager = RateLimitManager::default();
		let policy = policy(100, 60, 600);
		let ip = key("192.168.1.100");

		for i in 0..100 {
			let now = t0() + TimeDelta::milliseconds(i * 100);
			assert!(manager.admit(&policy, &ip, now).allowed, "request {} denied", i + 1);
		}
		let denied = manager.admit(&policy, &ip, t0() + TimeDelta::seconds(30));
		assert!(!denied.allowed);
		assert_eq!(denied.retry_after_seconds, Some(600));
	}

	#[test]
	fn test_mitigation_outlives_window() {
		let manager = RateLimitManager::default();
		let policy = policy(2, 10, 60);
		let ip = key("10.0.0.1");

		assert!(manager.admit(&policy, &ip, t0()).allowed);
		assert!(manager.admit(&policy, &ip, t0()).allowed);
		assert!(!manager.admit(&policy, &ip, t0()).allowed);

		// Counting window has reset but mitigation is still running
		let later = t0() + TimeDelta::seconds(20);
		let denied = manager.admit(&policy, &ip, later);
		assert!(!denied.allowed);
		assert_eq!(denied.retry_after_seconds, Some(40));

		// Mitigation over and a fresh window
		assert!(manager.admit(&policy, &ip, t0() + TimeDelta::seconds(60)).allowed);
	}

	#[test]
	fn test_zero_timeout_waits_for_window() {
		let manager = RateLimitManager::default();
		let policy = policy(1, 10, 0);
		let ip = key("10.0.0.2");

		assert!(manager.admit(&policy, &ip, t0()).allowed);
		let denied = manager.admit(&policy, &ip, t0() + TimeDelta::seconds(4));
		assert!(!denied.allowed);
		assert_eq!(denied.retry_after_seconds, Some(6));
		assert!(manager.admit(&policy, &ip, t0() + TimeDelta::seconds(10)).allowed);
	}

	#[test]
	fn test_keys_are_independent() {
		let manager = RateLimitManager::default();
		let policy = policy(1, 10, 30);

		assert!(manager.admit(&policy, &key("10.0.0.1"), t0()).allowed);
		assert!(!manager.admit(&policy, &key("10.0.0.1"), t0()).allowed);
		assert!(manager.admit(&policy, &key("10.0.0.2"), t0()).allowed);
	}

	#[test]
	fn test_unparsed_sources_share_bucket() {
		let manager = RateLimitManager::default();
		let policy = policy(1, 10, 30);

		assert!(manager.admit(&policy, &key("bogus"), t0()).allowed);
		assert!(!manager.admit(&policy, &key("also bogus"), t0()).allowed);
	}

	#[test]
	fn test_sweep_removes_only_expired() {
		let manager = RateLimitManager::new(LimiterConfig { max_tracked_keys: 1000, sweep_every: 0 });
		let policy = policy(1, 10, 100);

		manager.admit(&policy, &key("10.0.0.1"), t0());
		manager.admit(&policy, &key("10.0.0.2"), t0());
		manager.admit(&policy, &key("10.0.0.2"), t0()); // mitigated for 100s
		assert_eq!(manager.stats().tracked_keys, 2);

		assert_eq!(manager.sweep(t0() + TimeDelta::seconds(5)), 0);
		assert_eq!(manager.sweep(t0() + TimeDelta::seconds(10)), 1);
		assert_eq!(manager.stats().tracked_keys, 1);

		// The mitigated key is still denied after the sweep
		assert!(!manager.admit(&policy, &key("10.0.0.2"), t0() + TimeDelta::seconds(50)).allowed);
		assert_eq!(manager.sweep(t0() + TimeDelta::seconds(100)), 1);
		assert_eq!(manager.stats().total_evicted, 2);
	}

	#[test]
	fn test_eviction_does_not_change_outcome() {
		let policy = policy(1, 10, 0);
		let swept = RateLimitManager::new(LimiterConfig { max_tracked_keys: 1, sweep_every: 1 });
		let kept = RateLimitManager::new(LimiterConfig { max_tracked_keys: 1000, sweep_every: 0 });

		for step in 0..50 {
			let now = t0() + TimeDelta::seconds(step * 3);
			for ip in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
				assert_eq!(
					swept.admit(&policy, &key(ip), now),
					kept.admit(&policy, &key(ip), now),
					"diverged at step {} for {}",
					step,
					ip
				);
			}
		}
	}

	#[test]
	fn test_stats() {
		let manager = RateLimitManager::default();
		let policy = policy(1, 10, 60);

		manager.admit(&policy, &key("10.0.0.9"), t0());
		assert!(!manager.admit(&policy, &key("10.0.0.9"), t0()).allowed);
		assert!(manager.admit(&policy, &key("10.0.0.10"), t0()).allowed);

		let stats = manager.stats();
		assert_eq!(stats.total_admitted, 2);
		assert_eq!(stats.total_denied, 1);
		assert_eq!(stats.tracked_keys, 2);
		assert_eq!(stats.total_evicted, 0);
	}

	#[test]
	fn test_concurrent_admissions_respect_quota() {
		let manager = RateLimitManager::default();
		let policy = policy(50, 60, 60);
		let ip = key("172.16.0.1");
		let admitted = AtomicU64::new(0);

		std::thread::scope(|scope| {
			for _ in 0..8 {
				scope.spawn(|| {
					for _ in 0..25 {
						if manager.admit(&policy, &ip, t0()).allowed {
							admitted.fetch_add(1, Ordering::Relaxed);
						}
					}
				});
			}
		});

		assert_eq!(admitted.load(Ordering::Relaxed), 50);
	}

	#[test]
	fn test_admissions_proceed_during_large_sweep() {
		let manager = RateLimitManager::new(LimiterConfig { max_tracked_keys: 1_000_000, sweep_every: 0 });
		let short = policy(1, 10, 0);
		let long = policy(1, 10, 3600);
		let mitigated = key("192.0.2.1");

		for i in 0..50_000u32 {
			let ip = RateKey::Addr(std::net::Ipv4Addr::from(0x0a00_0000 + i).into());
			manager.admit(&short, &ip, t0());
		}
		manager.admit(&long, &mitigated, t0());
		manager.admit(&long, &mitigated, t0());
		assert_eq!(manager.stats().tracked_keys, 50_001);

		let later = t0() + TimeDelta::seconds(20);
		let sweeping = std::sync::atomic::AtomicBool::new(true);
		let barrier = std::sync::Barrier::new(5);

		std::thread::scope(|scope| {
			scope.spawn(|| {
				barrier.wait();
				assert_eq!(manager.sweep(later), 50_000);
				sweeping.store(false, Ordering::Release);
			});
			for worker in 0..4u16 {
				let (manager, long, mitigated) = (&manager, &long, &mitigated);
				let (sweeping, barrier) = (&sweeping, &barrier);
				scope.spawn(move || {
					barrier.wait();
					let mut n = 0u16;
					while n < 100 || (sweeping.load(Ordering::Acquire) && n < u16::MAX) {
						let fresh = RateKey::Addr(std::net::Ipv6Addr::new(0x2001, 0xdb8, worker, 0, 0, 0, 0, n).into());
						assert!(manager.admit(long, &fresh, later).allowed);
						assert!(!manager.admit(long, mitigated, later).allowed);
						n += 1;
					}
				});
			}
		});

		// Only the expired keys went away
		let stats = manager.stats();
		assert_eq!(stats.total_evicted, 50_000);
		assert!(stats.tracked_keys > 4 * 100);
		assert!(!manager.admit(&long, &mitigated, later).allowed);
	}
}

// vim: ts=4
