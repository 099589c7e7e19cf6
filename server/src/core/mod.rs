//! Core subsystem. Runtime glue between HTTP and the decision engine.

pub mod app;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod settings;

pub use crate::core::middleware::{MaintenanceLayer, MaintenanceService};

// vim: ts=4
