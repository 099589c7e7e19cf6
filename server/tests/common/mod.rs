//! Shared fixtures for the server integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use chrono::{TimeDelta, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use edgegate::core::app::{AppBuilderOpts, AppState};
use edgegate::{App, ServerMode};
use edgegate_types::config::{RawMaintenanceConfig, RawMaintenanceWindow, RawRateLimitPolicy};

pub const ADMIN_KEY: &str = "test-admin-key";
pub const ORIGIN_BODY: &str = "hello from origin";

pub fn app(mode: ServerMode) -> App {
	let opts = AppBuilderOpts { mode, admin_key: Some(ADMIN_KEY.into()), ..Default::default() };
	Arc::new(AppState::new(opts).unwrap())
}

/// Stand-in for the origin site
pub fn stub_origin() -> Router {
	Router::new().fallback(async || (StatusCode::OK, ORIGIN_BODY))
}

pub fn router(app: &App) -> Router {
	edgegate::routes::init_with_origin(app.clone(), stub_origin())
}

pub fn get(path: &str, peer: &str) -> Request<Body> {
	request("GET", path, peer, &[])
}

pub fn request(method: &str, path: &str, peer: &str, headers: &[(&str, &str)]) -> Request<Body> {
	let mut builder = Request::builder().method(method).uri(path);
	for (name, value) in headers {
		builder = builder.header(*name, *value);
	}
	let mut req = builder.body(Body::empty()).unwrap();
	let addr: SocketAddr = format!("{}:40000", peer).parse().unwrap();
	req.extensions_mut().insert(ConnectInfo(addr));
	req
}

pub fn admin_request(method: &str, path: &str, body: Option<&str>) -> Request<Body> {
	let builder = Request::builder()
		.method(method)
		.uri(format!("/__edgegate/api{}", path))
		.header("authorization", format!("Bearer {}", ADMIN_KEY))
		.header("content-type", "application/json");
	builder.body(body.map_or_else(Body::empty, |b| Body::from(b.to_string()))).unwrap()
}

pub async fn send(router: &Router, req: Request<Body>) -> Response<Body> {
	router.clone().oneshot(req).await.unwrap()
}

pub async fn body_text(res: Response<Body>) -> String {
	let bytes = res.into_body().collect().await.unwrap().to_bytes();
	String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn maintenance_on() -> RawMaintenanceConfig {
	RawMaintenanceConfig { enabled: true, ..Default::default() }
}

pub fn rate_limited(requests: u64, action: &str) -> RawMaintenanceConfig {
	RawMaintenanceConfig {
		enabled: true,
		rate_limit: Some(RawRateLimitPolicy {
			enabled: true,
			requests_per_period: requests,
			period_seconds: 60,
			action: Some(action.into()),
			mitigation_timeout_seconds: 600,
		}),
		..Default::default()
	}
}

/// Window around now, offsets in hours
pub fn window(start_hours: i64, end_hours: i64) -> RawMaintenanceWindow {
	let now = Utc::now();
	RawMaintenanceWindow {
		start_time: (now + TimeDelta::hours(start_hours)).to_rfc3339(),
		end_time: (now + TimeDelta::hours(end_hours)).to_rfc3339(),
	}
}

// vim: ts=4
