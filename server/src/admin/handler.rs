//! Admin API handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::core::app::VERSION;
use crate::prelude::*;
use edgegate_types::config::RawMaintenanceConfig;

/// GET /status
pub async fn get_status(State(app): State<App>) -> Json<Value> {
	let snapshot = app.store.snapshot();
	let stats = app.engine.limiter().stats();

	Json(json!({
		"status": "ok",
		"service": "edgegate",
		"version": VERSION,
		"timestamp": Utc::now().to_rfc3339(),
		"configLoadedAt": snapshot.loaded_at.to_rfc3339(),
		"deployment": snapshot.status,
		"rateLimiter": {
			"trackedKeys": stats.tracked_keys,
			"totalAdmitted": stats.total_admitted,
			"totalDenied": stats.total_denied,
			"totalEvicted": stats.total_evicted,
		},
	}))
}

/// GET /config
pub async fn get_config(State(app): State<App>) -> Json<RawMaintenanceConfig> {
	Json(app.store.snapshot().raw.clone())
}

/// PUT /config
///
/// The previous configuration stays active when the new one is rejected.
pub async fn put_config(
	State(app): State<App>,
	body: Result<Json<RawMaintenanceConfig>, JsonRejection>,
) -> EgResult<Json<Value>> {
	let Json(raw) = body.map_err(|e| Error::Parse(e.body_text()))?;
	let snapshot = app.store.publish(raw)?;
	info!("Configuration replaced through admin API");

	Ok(Json(json!({
		"status": "ok",
		"deployment": snapshot.status,
	})))
}

// vim: ts=4
