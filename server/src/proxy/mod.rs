//! Origin forwarding for requests the gate lets through

pub mod handler;

pub use handler::Origin;

// vim: ts=4
