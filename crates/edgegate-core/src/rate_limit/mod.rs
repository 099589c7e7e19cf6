//! Rate Limiting
//!
//! Fixed-window request counting keyed by source IP, with a mitigation timeout
//! that keeps an offending key denied past the end of its counting window.
//!
//! Counters are local to one process. When the gate runs as many independent
//! instances the effective global limit is approximate: each instance only sees
//! its own share of a key's traffic.

mod api;
mod config;
mod extractors;
mod limiter;

pub use api::{Admission, RateLimitApi, RateLimiterStats};
pub use config::LimiterConfig;
pub use extractors::RateKey;
pub use limiter::RateLimitManager;

// vim: ts=4
