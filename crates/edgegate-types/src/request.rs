//! Per-request input and output types

use axum::http::StatusCode;
use chrono::{DateTime, Utc};

use crate::config::RateLimitAction;

/// Request attributes supplied by the hosting runtime
///
/// `source_ip` is kept as received; it may be missing or malformed and the
/// engine has to cope with that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
	pub source_ip: Box<str>,
	/// Country code resolved upstream, trusted as given
	pub region: Option<Box<str>>,
	pub path: Box<str>,
	/// Raw `Accept-Language` header
	pub accept_language: Option<Box<str>>,
	pub user_agent: Option<Box<str>>,
	pub now: DateTime<Utc>,
}

impl Request {
	pub fn new(source_ip: impl Into<Box<str>>, path: impl Into<Box<str>>, now: DateTime<Utc>) -> Self {
		Self {
			source_ip: source_ip.into(),
			region: None,
			path: path.into(),
			accept_language: None,
			user_agent: None,
			now,
		}
	}

	pub fn with_region(mut self, region: impl Into<Box<str>>) -> Self {
		self.region = Some(region.into());
		self
	}

	pub fn with_accept_language(mut self, accept_language: impl Into<Box<str>>) -> Self {
		self.accept_language = Some(accept_language.into());
		self
	}

	pub fn with_user_agent(mut self, user_agent: impl Into<Box<str>>) -> Self {
		self.user_agent = Some(user_agent.into());
		self
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
	Pass,
	Maintenance,
	RateLimited,
}

impl Action {
	pub fn as_str(&self) -> &'static str {
		match self {
			Action::Pass => "PASS",
			Action::Maintenance => "MAINTENANCE",
			Action::RateLimited => "RATE_LIMITED",
		}
	}

	/// Status of the response produced by the gate, `None` for pass-through
	pub fn status_code(&self) -> Option<StatusCode> {
		match self {
			Action::Pass => None,
			Action::Maintenance => Some(StatusCode::SERVICE_UNAVAILABLE),
			Action::RateLimited => Some(StatusCode::TOO_MANY_REQUESTS),
		}
	}
}

impl std::fmt::Display for Action {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
	pub action: Action,
	pub body: Option<String>,
	pub retry_after_seconds: Option<u64>,
	/// Set when a challenge action tripped, so the caller may present one
	pub challenge: Option<RateLimitAction>,
	/// Language of the rendered body
	pub language: Option<&'static str>,
	/// The body is the simplified page served to crawlers
	pub crawler: bool,
}

impl Decision {
	pub fn new(action: Action) -> Self {
		Self { action, body: None, retry_after_seconds: None, challenge: None, language: None, crawler: false }
	}

	pub fn pass() -> Self {
		Self::new(Action::Pass)
	}

	pub fn is_pass(&self) -> bool {
		self.action == Action::Pass
	}
}


// vim: ts=4
