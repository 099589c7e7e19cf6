//! Error types
//!
//! `ValidationError` is the closed set of configuration failures. `Error` is the
//! crate-wide error used by everything outside the per-request decision path.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub type EgResult<T> = std::result::Result<T, Error>;

/// A configuration rejected at load time
///
/// Every variant names the offending field and carries the offending value, so
/// operators can fix the document without guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	/// `rateLimit.periodSeconds` below the minimum while rate limiting is enabled
	RateLimitPeriodTooLow { value: u64, min: u64 },
	/// `rateLimit.action` is not one of the recognized actions
	InvalidRateLimitAction { value: Box<str> },
	/// `rateLimit.requestsPerPeriod` must be positive
	InvalidRateLimitQuota { value: u64 },
	/// An `allowedRegions` entry is not a known ISO-3166 alpha-2 code
	InvalidRegionCode { value: Box<str> },
	/// An `allowedIps` entry is neither an address nor a CIDR block
	InvalidIpLiteral { value: Box<str> },
	/// `window.startTime` is not strictly before `window.endTime`
	InvalidWindowOrdering { start: Box<str>, end: Box<str> },
	/// A window timestamp is not RFC 3339
	InvalidTimestamp { field: &'static str, value: Box<str> },
	/// An `allowedPaths` entry is not a valid regular expression
	InvalidPathPattern { value: Box<str>, reason: Box<str> },
	/// `logoUrl` is not an absolute https URL
	InvalidLogoUrl { value: Box<str> },
}

impl ValidationError {
	/// Configuration field the error refers to
	pub fn field(&self) -> &'static str {
		match self {
			ValidationError::RateLimitPeriodTooLow { .. } => "rateLimit.periodSeconds",
			ValidationError::InvalidRateLimitAction { .. } => "rateLimit.action",
			ValidationError::InvalidRateLimitQuota { .. } => "rateLimit.requestsPerPeriod",
			ValidationError::InvalidRegionCode { .. } => "allowedRegions",
			ValidationError::InvalidIpLiteral { .. } => "allowedIps",
			ValidationError::InvalidWindowOrdering { .. } => "window",
			ValidationError::InvalidTimestamp { field, .. } => field,
			ValidationError::InvalidPathPattern { .. } => "allowedPaths",
			ValidationError::InvalidLogoUrl { .. } => "logoUrl",
		}
	}

	/// Stable machine-readable code
	pub fn code(&self) -> &'static str {
		match self {
			ValidationError::RateLimitPeriodTooLow { .. } => "E-CFG-RATE-PERIOD",
			ValidationError::InvalidRateLimitAction { .. } => "E-CFG-RATE-ACTION",
			ValidationError::InvalidRateLimitQuota { .. } => "E-CFG-RATE-QUOTA",
			ValidationError::InvalidRegionCode { .. } => "E-CFG-REGION",
			ValidationError::InvalidIpLiteral { .. } => "E-CFG-IP",
			ValidationError::InvalidWindowOrdering { .. } => "E-CFG-WINDOW",
			ValidationError::InvalidTimestamp { .. } => "E-CFG-TIMESTAMP",
			ValidationError::InvalidPathPattern { .. } => "E-CFG-PATH",
			ValidationError::InvalidLogoUrl { .. } => "E-CFG-LOGO",
		}
	}
}

impl std::fmt::Display for ValidationError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ValidationError::RateLimitPeriodTooLow { value, min } => {
				write!(f, "{}: {} is below the minimum of {} seconds", self.field(), value, min)
			}
			ValidationError::InvalidRateLimitAction { value } => {
				write!(f, "{}: unrecognized action '{}'", self.field(), value)
			}
			ValidationError::InvalidRateLimitQuota { value } => {
				write!(f, "{}: {} must be greater than zero", self.field(), value)
			}
			ValidationError::InvalidRegionCode { value } => {
				write!(f, "{}: '{}' is not an ISO-3166 alpha-2 code", self.field(), value)
			}
			ValidationError::InvalidIpLiteral { value } => {
				write!(f, "{}: '{}' is not an IP address or CIDR block", self.field(), value)
			}
			ValidationError::InvalidWindowOrdering { start, end } => {
				write!(f, "{}: startTime {} is not before endTime {}", self.field(), start, end)
			}
			ValidationError::InvalidTimestamp { field, value } => {
				write!(f, "{}: '{}' is not an RFC 3339 timestamp", field, value)
			}
			ValidationError::InvalidPathPattern { value, reason } => {
				write!(f, "{}: invalid pattern '{}': {}", self.field(), value, reason)
			}
			ValidationError::InvalidLogoUrl { value } => {
				write!(f, "{}: '{}' is not an absolute https URL", self.field(), value)
			}
		}
	}
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
pub enum Error {
	NotFound,
	Unauthorized,
	Validation(ValidationError),
	ConfigError(String),
	Parse(String),
	NetworkError(String),
	Timeout,
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<ValidationError> for Error {
	fn from(err: ValidationError) -> Self {
		Self::Validation(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Parse(err.to_string())
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::Validation(err) => write!(f, "invalid configuration: {}", err),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Parse(msg) => write!(f, "parse error: {}", msg),
			Error::NetworkError(msg) => write!(f, "network error: {}", msg),
			Error::Timeout => write!(f, "timeout"),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Validation(err) => Some(err),
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let (status, code, message) = match &self {
			Error::NotFound => (StatusCode::NOT_FOUND, "E-NOT-FOUND", "Not found".to_string()),
			Error::Unauthorized => {
				(StatusCode::UNAUTHORIZED, "E-UNAUTHORIZED", "Unauthorized".to_string())
			}
			Error::Validation(err) => (StatusCode::BAD_REQUEST, err.code(), err.to_string()),
			Error::Parse(msg) => (StatusCode::BAD_REQUEST, "E-PARSE", msg.clone()),
			Error::NetworkError(_) => {
				(StatusCode::BAD_GATEWAY, "E-BAD-GATEWAY", "Origin unreachable".to_string())
			}
			Error::Timeout => {
				(StatusCode::GATEWAY_TIMEOUT, "E-TIMEOUT", "Origin timed out".to_string())
			}
			Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => (
				StatusCode::INTERNAL_SERVER_ERROR,
				"E-INTERNAL",
				"Internal server error".to_string(),
			),
		};

		let mut body = serde_json::json!({
			"error": {
				"code": code,
				"message": message,
			}
		});
		if let Error::Validation(err) = &self {
			body["error"]["details"] = serde_json::json!({ "field": err.field() });
		}

		(status, Json(body)).into_response()
	}
}


// vim: ts=4
