//! Rate limit key derivation

use std::net::IpAddr;

/// Key a request is counted under
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum RateKey {
	/// Parsed source address
	Addr(IpAddr),
	/// Shared bucket for requests whose source IP is missing or malformed.
	/// Skipping them instead would be a trivial bypass.
	Unparsed,
}

impl RateKey {
	pub fn from_source(source_ip: &str) -> Self {
		source_ip.trim().parse::<IpAddr>().map_or(RateKey::Unparsed, RateKey::Addr)
	}

	/// Key name for logging
	pub fn label(&self) -> String {
		match self {
			RateKey::Addr(addr) => addr.to_string(),
			RateKey::Unparsed => "<unparsed>".to_string(),
		}
	}
}


// vim: ts=4
