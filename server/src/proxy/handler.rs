//! HTTP forwarding to the origin

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request, Uri};
use axum::response::{IntoResponse, Response};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::{client::legacy::Client, rt::TokioExecutor};

use crate::prelude::*;

/// Headers that should not be forwarded between client and origin (hop-by-hop)
const HOP_BY_HOP_HEADERS: &[&str] = &[
	"connection",
	"keep-alive",
	"proxy-authenticate",
	"proxy-authorization",
	"te",
	"trailers",
	"transfer-encoding",
	"upgrade",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
	HOP_BY_HOP_HEADERS.iter().any(|h| name.as_str().eq_ignore_ascii_case(h))
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
	let names: Vec<HeaderName> = headers.keys().filter(|name| is_hop_by_hop(name)).cloned().collect();
	for name in names {
		headers.remove(&name);
	}
}

/// The upstream site that passed requests are forwarded to
pub struct Origin {
	base: url::Url,
	timeout: Duration,
	client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl Origin {
	pub fn new(base: &str, timeout: Duration) -> EgResult<Self> {
		let base = url::Url::parse(base)
			.map_err(|e| Error::ConfigError(format!("origin URL '{}': {}", base, e)))?;
		if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
			return Err(Error::ConfigError(format!("origin URL '{}' must be http(s) with a host", base)));
		}

		// Plain http origins work without any root certificates installed
		let tls = match hyper_rustls::HttpsConnectorBuilder::new().with_native_roots() {
			Ok(tls) => tls,
			Err(_) if base.scheme() == "http" => hyper_rustls::HttpsConnectorBuilder::new()
				.with_tls_config(
					rustls::ClientConfig::builder()
						.with_root_certificates(rustls::RootCertStore::empty())
						.with_no_client_auth(),
				),
			Err(_) => {
				return Err(Error::ConfigError("no native root CA certificates found".into()));
			}
		};
		let connector = tls.https_or_http().enable_http1().build();
		let client = Client::builder(TokioExecutor::new()).build(connector);

		Ok(Self { base, timeout, client })
	}

	/// Build the origin URI for an incoming request URI
	pub fn build_origin_uri(&self, original: &Uri) -> EgResult<Uri> {
		let mut target = self.base.clone();
		let combined_path = format!("{}{}", target.path().trim_end_matches('/'), original.path());
		target.set_path(&combined_path);
		target.set_query(original.query());
		target
			.as_str()
			.parse::<Uri>()
			.map_err(|e| Error::Internal(format!("failed to build origin URI: {}", e)))
	}

	/// Forward a request and return the origin's response
	pub async fn forward(&self, req: Request<Body>, peer: Option<SocketAddr>) -> EgResult<Response> {
		let uri = self.build_origin_uri(req.uri())?;
		let (mut parts, body) = req.into_parts();
		parts.uri = uri;
		strip_hop_by_hop(&mut parts.headers);

		if let Some(peer) = peer {
			let forwarded = match parts.headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
				Some(prev) => format!("{}, {}", prev, peer.ip()),
				None => peer.ip().to_string(),
			};
			if let Ok(hv) = HeaderValue::from_str(&forwarded) {
				parts.headers.insert(HeaderName::from_static("x-forwarded-for"), hv);
			}
		}

		let origin_req = Request::from_parts(parts, body);
		match tokio::time::timeout(self.timeout, self.client.request(origin_req)).await {
			Ok(Ok(res)) => {
				let mut res = res.map(Body::new);
				strip_hop_by_hop(res.headers_mut());
				Ok(res)
			}
			Ok(Err(e)) => {
				warn!("Origin error for {}: {}", self.base, e);
				Err(Error::NetworkError(e.to_string()))
			}
			Err(_) => {
				warn!("Origin timeout for {}", self.base);
				Err(Error::Timeout)
			}
		}
	}
}

/// Fallback handler: forward a passed request to the origin
pub async fn forward(State(app): State<App>, req: Request<Body>) -> Response {
	let peer = req.extensions().get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0);
	let Some(origin) = app.origin.as_ref() else {
		return Error::NetworkError("no origin configured".into()).into_response();
	};
	let host = req.headers().get(header::HOST).and_then(|h| h.to_str().ok()).map(str::to_string);
	debug!("Forwarding {} {} (host {:?})", req.method(), req.uri().path(), host);

	match origin.forward(req, peer).await {
		Ok(res) => res,
		Err(err) => err.into_response(),
	}
}


// vim: ts=4
