//! Decision engine
//!
//! Composes window, allowlist and rate limit checks into one outcome per
//! request. Checks run cheapest first so the common inactive path does no work.

use std::sync::Arc;

use crate::prelude::*;
use crate::rate_limit::{RateKey, RateLimitApi};
use crate::render::PageRenderer;
use crate::{allowlist, crawler, locale, window};
use edgegate_types::config::MaintenanceConfig;
use edgegate_types::request::{Action, Decision, Request};

pub struct DecisionEngine {
	limiter: Arc<dyn RateLimitApi>,
	renderer: PageRenderer,
}

impl DecisionEngine {
	pub fn new(limiter: Arc<dyn RateLimitApi>) -> EgResult<Self> {
		Ok(Self { limiter, renderer: PageRenderer::new()? })
	}

	pub fn limiter(&self) -> &Arc<dyn RateLimitApi> {
		&self.limiter
	}

	/// Decide what to do with one request
	///
	/// Rate limit state is only touched when the request reaches the rate limit
	/// step; `PASS` outcomes never mutate anything.
	pub fn decide(&self, config: &MaintenanceConfig, request: &Request) -> Decision {
		if !config.enabled || !window::is_active(config, request.now) {
			return Decision::pass();
		}
		if allowlist::is_exempt(config, request) {
			return Decision::pass();
		}

		if let Some(policy) = config.active_rate_limit() {
			let key = RateKey::from_source(&request.source_ip);
			let admission = self.limiter.admit(policy, &key, request.now);
			if !admission.allowed {
				let limited = Decision {
					retry_after_seconds: admission.retry_after_seconds,
					..Decision::new(Action::RateLimited)
				};
				if !policy.action.is_enforced() {
					info!(
						"Rate limit exceeded by {} (log only, retry after {:?}s)",
						key.label(),
						admission.retry_after_seconds
					);
				} else if policy.action.is_challenge() {
					let challenged = Decision { challenge: Some(policy.action), ..limited };
					return self.rendered(config, request, challenged);
				} else {
					return limited;
				}
			}
		}

		let retry_after_seconds =
			window::seconds_until_end(config, request.now).or(config.retry_after_seconds);
		let decision = Decision {
			retry_after_seconds,
			crawler: crawler::is_crawler(request.user_agent.as_deref()),
			..Decision::new(Action::Maintenance)
		};
		self.rendered(config, request, decision)
	}

	fn rendered(&self, config: &MaintenanceConfig, request: &Request, mut decision: Decision) -> Decision {
		decision.language = Some(locale::negotiate_language(request.accept_language.as_deref()));
		decision.body = Some(self.renderer.render(config, &decision));
		decision
	}
}


// vim: ts=4
