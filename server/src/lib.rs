//! edgegate is a maintenance gate that sits in front of a website.
//!
//! # Features
//!
//! - Maintenance page with optional scheduled window
//!	- Allowlists by client IP / CIDR, region and path
//!	- Per-IP rate limiting while maintenance is active
//!		- block, challenge or log on excess
//!	- Forwarding of passed requests to the origin
//!	- Admin API to inspect and replace the configuration at runtime

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod admin;
pub mod core;
pub mod prelude;
pub mod proxy;
pub mod routes;

pub use crate::core::app::{App, AppBuilder, AppState, ServerMode};

// vim: ts=4
