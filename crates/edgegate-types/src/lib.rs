//! Shared types for the edgegate maintenance gate.
//!
//! Holds the configuration model (raw and validated), the per-request input and
//! output types and the error types, so the engine and the server agree on them
//! without depending on each other.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod prelude;
pub mod request;

// vim: ts=4
