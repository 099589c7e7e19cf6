//! Rate limiter resource configuration

/// Bounds on the per-key state store
///
/// These only govern memory; they never change an admit/deny outcome.
#[derive(Clone, Debug)]
pub struct LimiterConfig {
	/// Key count at which an admission triggers a sweep of expired entries
	pub max_tracked_keys: usize,
	/// Sweep opportunistically every N admissions
	pub sweep_every: u64,
}

impl Default for LimiterConfig {
	fn default() -> Self {
		Self { max_tracked_keys: 100_000, sweep_every: 4096 }
	}
}

// vim: ts=4
