//! Turning gate decisions into HTTP responses

use axum::body::Body;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;

use edgegate_types::request::Decision;

pub const CHALLENGE_HEADER: &str = "x-maintenance-challenge";

const NO_CACHE: &str = "no-store, no-cache, must-revalidate";
const CSP: &str = "default-src 'none'; img-src https:; style-src 'unsafe-inline'; frame-ancestors 'none'; base-uri 'none'; form-action 'none'";

/// Response for a non-pass decision
///
/// A pass decision has no response of its own; the caller forwards instead.
/// Called with one anyway, this yields an empty 204.
pub fn decision_response(decision: Decision) -> Response {
	let Some(status) = decision.action.status_code() else {
		let mut res = Response::new(Body::empty());
		*res.status_mut() = StatusCode::NO_CONTENT;
		return res;
	};

	let (content_type, body) = match decision.body {
		Some(html) => ("text/html;charset=UTF-8", Body::from(html)),
		None => ("text/plain;charset=UTF-8", Body::from("Too Many Requests\n")),
	};

	let mut res = Response::new(body);
	*res.status_mut() = status;

	let headers = res.headers_mut();
	headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
	headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
	headers.insert(HeaderName::from_static("x-robots-tag"), HeaderValue::from_static("noindex"));
	headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
	headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
	headers.insert(
		header::REFERRER_POLICY,
		HeaderValue::from_static("strict-origin-when-cross-origin"),
	);
	headers.insert(header::CONTENT_SECURITY_POLICY, HeaderValue::from_static(CSP));

	if let Some(language) = decision.language {
		headers.insert(header::CONTENT_LANGUAGE, HeaderValue::from_static(language));
	}
	if let Some(retry) = decision.retry_after_seconds {
		headers.insert(header::RETRY_AFTER, HeaderValue::from(retry));
	}
	if let Some(challenge) = decision.challenge {
		headers.insert(
			HeaderName::from_static(CHALLENGE_HEADER),
			HeaderValue::from_static(challenge.as_str()),
		);
	}

	res
}


// vim: ts=4
