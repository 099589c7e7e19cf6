//! Request admission engine for the edgegate maintenance gate.
//!
//! Decides per request whether to let it through to the origin, serve the
//! maintenance page, or reject it as rate limited. Everything here is
//! synchronous and free of I/O; the hosting server supplies request attributes
//! and turns decisions into responses.
//!
//! Per request: [`window`] decides whether maintenance is on, [`allowlist`]
//! exempts trusted clients, [`rate_limit`] counts the rest, and [`engine`]
//! combines them, with [`render`] producing the page body in the language
//! [`locale`] negotiates.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod allowlist;
pub mod crawler;
pub mod engine;
pub mod locale;
pub mod prelude;
pub mod rate_limit;
pub mod region;
pub mod render;
pub mod status;
pub mod store;
pub mod validate;
pub mod window;

use chrono::TimeDelta;

pub use engine::DecisionEngine;
pub use store::{ConfigSnapshot, ConfigStore};

/// Whole seconds, rounded up; zero for non-positive durations
pub(crate) fn ceil_seconds(delta: TimeDelta) -> u64 {
	if delta <= TimeDelta::zero() {
		return 0;
	}
	let whole = delta.num_seconds() as u64;
	if delta.subsec_nanos() > 0 { whole + 1 } else { whole }
}


// vim: ts=4
