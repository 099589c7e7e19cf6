//! Request attribute extraction
//!
//! Turns an HTTP request into the attributes the decision engine looks at:
//! client address, region, path and the headers the page is tailored to.

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};
use hyper::Request;

use crate::core::app::ServerMode;
use edgegate_types::request::Request as GateRequest;

/// Client address as reported by the connection or forwarding headers
///
/// The value is kept as received. A missing or malformed address yields a
/// string the engine cannot parse, which is rate limited under a shared key.
pub fn extract_source_ip<B>(req: &Request<B>, mode: ServerMode) -> Box<str> {
	let source = match mode {
		ServerMode::Standalone => peer_ip(req),
		ServerMode::Proxy => header_value(req.headers(), "cf-connecting-ip")
			.or_else(|| extract_from_xff(req.headers()))
			.or_else(|| header_value(req.headers(), "x-real-ip"))
			.or_else(|| extract_from_forwarded(req.headers()))
			.or_else(|| peer_ip(req)),
	};
	source.unwrap_or_default().into()
}

/// Region code from the configured header, if present and non-empty
pub fn extract_region<B>(req: &Request<B>, header: &str) -> Option<Box<str>> {
	header_value(req.headers(), header).map(Into::into)
}

/// Build the engine's view of an HTTP request
pub fn gate_request<B>(
	req: &Request<B>,
	mode: ServerMode,
	region_header: &str,
	now: DateTime<Utc>,
) -> GateRequest {
	GateRequest {
		source_ip: extract_source_ip(req, mode),
		region: extract_region(req, region_header),
		path: req.uri().path().into(),
		accept_language: header_value(req.headers(), header::ACCEPT_LANGUAGE.as_str()).map(Into::into),
		user_agent: header_value(req.headers(), header::USER_AGENT.as_str()).map(Into::into),
		now,
	}
}

fn peer_ip<B>(req: &Request<B>) -> Option<String> {
	req.extensions().get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0.ip().to_string())
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
	headers
		.get(name)
		.and_then(|h| h.to_str().ok())
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.map(str::to_string)
}

/// Leftmost entry of X-Forwarded-For
fn extract_from_xff(headers: &HeaderMap) -> Option<String> {
	header_value(headers, "x-forwarded-for")
		.and_then(|s| s.split(',').next().map(|ip| ip.trim().to_string()))
		.filter(|ip| !ip.is_empty())
}

/// `for=` parameter of the Forwarded header (RFC 7239)
fn extract_from_forwarded(headers: &HeaderMap) -> Option<String> {
	let value = header_value(headers, "forwarded")?;
	let element = value.split(',').next()?;
	element.split(';').find_map(|part| {
		let (key, value) = part.trim().split_once('=')?;
		if !key.trim().eq_ignore_ascii_case("for") {
			return None;
		}
		let cleaned = value.trim().trim_matches('"');
		// "[2001:db8::1]:4711" or "192.0.2.60:4711"
		let host = if let Some(rest) = cleaned.strip_prefix('[') {
			rest.split(']').next().unwrap_or_default()
		} else if cleaned.matches(':').count() == 1 {
			cleaned.split(':').next().unwrap_or_default()
		} else {
			cleaned
		};
		Some(host.to_string())
	})
}


// vim: ts=4
