//! Admin API

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use edgegate::core::app::{AppBuilderOpts, AppState};
use edgegate::ServerMode;
use serde_json::Value;

async fn json(res: axum::http::Response<Body>) -> Value {
	serde_json::from_str(&body_text(res).await).unwrap()
}

#[tokio::test]
async fn test_requires_bearer_key() {
	let app = app(ServerMode::Standalone);
	let router = router(&app);

	let req = Request::builder().uri("/__edgegate/api/status").body(Body::empty()).unwrap();
	let res = send(&router, req).await;
	assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(json(res).await["error"]["code"], "E-UNAUTHORIZED");

	let req = Request::builder()
		.uri("/__edgegate/api/status")
		.header("authorization", "Bearer wrong")
		.body(Body::empty())
		.unwrap();
	assert_eq!(send(&router, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
	let app = app(ServerMode::Standalone);
	let router = router(&app);

	for authorization in [format!("bearer {}", ADMIN_KEY), format!("BEARER  {}", ADMIN_KEY)] {
		let req = Request::builder()
			.uri("/__edgegate/api/status")
			.header("authorization", authorization)
			.body(Body::empty())
			.unwrap();
		assert_eq!(send(&router, req).await.status(), StatusCode::OK);
	}

	let req = Request::builder()
		.uri("/__edgegate/api/status")
		.header("authorization", format!("Basic {}", ADMIN_KEY))
		.body(Body::empty())
		.unwrap();
	assert_eq!(send(&router, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disabled_without_key() {
	let app = Arc::new(AppState::new(AppBuilderOpts::default()).unwrap());
	let router = router(&app);

	let res = send(&router, admin_request("GET", "/status", None)).await;
	assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status() {
	let app = app(ServerMode::Standalone);
	let router = router(&app);

	let res = send(&router, admin_request("GET", "/status", None)).await;
	assert_eq!(res.status(), StatusCode::OK);
	let body = json(res).await;
	assert_eq!(body["status"], "ok");
	assert_eq!(body["deployment"]["maintenanceEnabled"], false);
	assert_eq!(body["deployment"]["allowlistRulesetId"], "none-created");
	assert_eq!(body["deployment"]["rateLimitRulesetId"], "none-created");
	assert_eq!(body["deployment"]["routePattern"], "*");
}

#[tokio::test]
async fn test_put_then_get_config() {
	let app = app(ServerMode::Standalone);
	let router = router(&app);

	let doc = r#"{
		"enabled": true,
		"title": "Upgrading",
		"allowedIps": ["192.0.2.0/24"],
		"rateLimit": {"enabled": true, "requestsPerPeriod": 50, "periodSeconds": 60, "action": "challenge", "mitigationTimeoutSeconds": 120}
	}"#;
	let res = send(&router, admin_request("PUT", "/config", Some(doc))).await;
	assert_eq!(res.status(), StatusCode::OK);
	let body = json(res).await;
	assert_eq!(body["deployment"]["maintenanceEnabled"], true);
	assert!(body["deployment"]["allowlistRulesetId"].as_str().unwrap().starts_with("allow-"));
	assert!(body["deployment"]["rateLimitRulesetId"].as_str().unwrap().starts_with("ratelimit-"));

	let res = send(&router, admin_request("GET", "/config", None)).await;
	let body = json(res).await;
	assert_eq!(body["title"], "Upgrading");
	assert_eq!(body["rateLimit"]["action"], "challenge");

	// The new configuration is what gates traffic now
	let res = send(&router, get("/", "203.0.113.1")).await;
	assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_rejected_config_keeps_previous() {
	let app = app(ServerMode::Standalone);
	let router = router(&app);
	app.store.publish(maintenance_on()).unwrap();

	let doc = r#"{"enabled": false, "rateLimit": {"enabled": true, "requestsPerPeriod": 10, "periodSeconds": 5}}"#;
	let res = send(&router, admin_request("PUT", "/config", Some(doc))).await;
	assert_eq!(res.status(), StatusCode::BAD_REQUEST);
	let body = json(res).await;
	assert_eq!(body["error"]["code"], "E-CFG-RATE-PERIOD");
	assert_eq!(body["error"]["details"]["field"], "rateLimit.periodSeconds");

	assert!(app.store.snapshot().config.enabled);
	let res = send(&router, get("/", "203.0.113.1")).await;
	assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_malformed_body() {
	let app = app(ServerMode::Standalone);
	let router = router(&app);

	let res = send(&router, admin_request("PUT", "/config", Some("{not json"))).await;
	assert_eq!(res.status(), StatusCode::BAD_REQUEST);
	assert_eq!(json(res).await["error"]["code"], "E-PARSE");
}

#[tokio::test]
async fn test_unknown_admin_path() {
	let app = app(ServerMode::Standalone);
	app.store.publish(maintenance_on()).unwrap();
	let router = router(&app);

	let res = send(&router, admin_request("GET", "/nope", None)).await;
	assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// vim: ts=4
