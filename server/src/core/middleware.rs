//! Maintenance gate middleware
//!
//! Tower layer that asks the decision engine about every request and either
//! answers it directly or hands it to the inner service.

use std::task::{Context, Poll};

use axum::body::Body;
use chrono::Utc;
use futures::future::BoxFuture;
use hyper::Request;
use tower::{Layer, Service};

use crate::core::extract::gate_request;
use crate::core::response::decision_response;
use crate::prelude::*;
use edgegate_types::request::Action;

/// Maintenance gate middleware layer
#[derive(Clone)]
pub struct MaintenanceLayer {
	app: App,
}

impl MaintenanceLayer {
	pub fn new(app: App) -> Self {
		Self { app }
	}
}

impl<S> Layer<S> for MaintenanceLayer {
	type Service = MaintenanceService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		MaintenanceService { inner, app: self.app.clone() }
	}
}

/// Maintenance gate middleware service
#[derive(Clone)]
pub struct MaintenanceService<S> {
	inner: S,
	app: App,
}

impl<S> Service<Request<Body>> for MaintenanceService<S>
where
	S: Service<Request<Body>, Response = axum::response::Response> + Clone + Send + 'static,
	S::Future: Send + 'static,
{
	type Response = S::Response;
	type Error = S::Error;
	type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let app = self.app.clone();
		// Drive the clone that was polled ready, leave a fresh one behind
		let clone = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, clone);

		Box::pin(async move {
			let start = std::time::Instant::now();
			let gate = gate_request(&req, app.opts.mode, &app.opts.region_header, Utc::now());
			let snapshot = app.store.snapshot();
			let decision = app.engine.decide(&snapshot.config, &gate);

			if decision.action == Action::Pass {
				return inner.call(req).await;
			}

			let action = decision.action;
			let res = decision_response(decision);
			if action == Action::RateLimited {
				debug!("REQ [{}] {} {} -> {}", gate.source_ip, req.method(), gate.path, action);
			}
			info!("RES: {} {} tm:{:?}", res.status(), action, start.elapsed().as_millis());
			Ok(res)
		})
	}
}

// vim: ts=4
