use axum::{middleware, routing::get, Router};
use tower::Layer;
use tower_http::trace::TraceLayer;

use crate::admin::{self, ADMIN_PREFIX};
use crate::core::MaintenanceLayer;
use crate::prelude::*;
use crate::proxy;

fn init_admin(app: App) -> Router {
	Router::new()
		.route("/status", get(admin::handler::get_status))
		.route("/config", get(admin::handler::get_config).put(admin::handler::put_config))
		.fallback(async || Error::NotFound)
		.layer(middleware::from_fn_with_state(app.clone(), admin::require_admin))
		.with_state(app)
}

/// Router forwarding everything to the configured origin
pub fn init(app: App) -> Router {
	let origin = Router::new().fallback(proxy::handler::forward).with_state(app.clone());
	init_with_origin(app, origin)
}

/// Router gating `origin` behind the maintenance decision
///
/// The admin API is mounted beside the gate and never passes through it.
pub fn init_with_origin(app: App, origin: Router) -> Router {
	Router::new()
		.nest(ADMIN_PREFIX, init_admin(app.clone()))
		.fallback_service(MaintenanceLayer::new(app).layer(origin))
		.layer(TraceLayer::new_for_http())
}

// vim: ts=4
