//! Admin API
//!
//! Lets an operator inspect and replace the active maintenance configuration
//! without a restart. Disabled unless an admin key is configured.

pub mod handler;

use axum::{
	body::Body,
	extract::State,
	http::{header, Request},
	middleware::Next,
	response::Response,
};
use sha2::{Digest, Sha256};

use crate::prelude::*;

/// Mount point of the admin API
pub const ADMIN_PREFIX: &str = "/__edgegate/api";

/// Compare two secrets in time independent of where they differ
fn secrets_match(given: &str, expected: &str) -> bool {
	let given = Sha256::digest(given.as_bytes());
	let expected = Sha256::digest(expected.as_bytes());
	given.iter().zip(expected.iter()).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

/// Token of a `Bearer` credential; the scheme is matched case-insensitively
fn bearer_token(authorization: &str) -> Option<&str> {
	let (scheme, token) = authorization.trim().split_once(char::is_whitespace)?;
	let token = token.trim();
	(scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

pub async fn require_admin(
	State(app): State<App>,
	req: Request<Body>,
	next: Next,
) -> EgResult<Response> {
	// Without a key the API does not exist
	let Some(expected) = app.opts.admin_key.as_deref() else {
		return Err(Error::NotFound);
	};

	let token = req
		.headers()
		.get(header::AUTHORIZATION)
		.and_then(|h| h.to_str().ok())
		.and_then(bearer_token)
		.ok_or(Error::Unauthorized)?;

	if !secrets_match(token, expected) {
		warn!("Rejected admin request to {}", req.uri().path());
		return Err(Error::Unauthorized);
	}

	Ok(next.run(req).await)
}


// vim: ts=4
