//! App builder - constructs and runs the edgegate server

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::net::TcpListener;

use crate::proxy::Origin;
use crate::prelude::*;
use crate::core::settings;
use crate::routes;
use edgegate_core::rate_limit::{LimiterConfig, RateLimitManager};
use edgegate_core::{ConfigStore, DecisionEngine};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How the client address is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
	/// Clients connect directly; only the socket peer address is trusted
	Standalone,
	/// Behind a CDN or reverse proxy; forwarding headers are trusted
	Proxy,
}

#[derive(Debug, Clone)]
pub struct AppBuilderOpts {
	pub mode: ServerMode,
	pub listen: Box<str>,
	pub origin: Option<Box<str>>,
	pub origin_timeout: Duration,
	pub config_path: Option<Box<Path>>,
	pub admin_key: Option<Box<str>>,
	pub region_header: Box<str>,
	pub limiter: LimiterConfig,
	pub sweep_interval: Duration,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		Self {
			mode: ServerMode::Standalone,
			listen: "127.0.0.1:8080".into(),
			origin: None,
			origin_timeout: Duration::from_secs(30),
			config_path: None,
			admin_key: None,
			region_header: "cf-ipcountry".into(),
			limiter: LimiterConfig::default(),
			sweep_interval: Duration::from_secs(60),
		}
	}
}

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub store: ConfigStore,
	pub engine: DecisionEngine,
	pub origin: Option<Origin>,
}

impl AppState {
	pub fn new(opts: AppBuilderOpts) -> EgResult<Self> {
		let limiter = Arc::new(RateLimitManager::new(opts.limiter.clone()));
		let engine = DecisionEngine::new(limiter)?;
		let origin = opts
			.origin
			.as_deref()
			.map(|base| Origin::new(base, opts.origin_timeout))
			.transpose()?;

		let store = ConfigStore::new();
		if let Some(path) = opts.config_path.as_deref() {
			// A bad file leaves the pass-through config in effect
			match settings::load_config_file(path) {
				Ok(raw) => {
					if let Err(err) = store.publish(raw) {
						error!("Config {} rejected, staying in pass-through: {}", path.display(), err);
					}
				}
				Err(err) => {
					error!("Config {} unreadable, staying in pass-through: {}", path.display(), err);
				}
			}
		}

		Ok(Self { opts, store, engine, origin })
	}
}

pub type App = Arc<AppState>;

pub struct AppBuilder {
	opts: AppBuilderOpts,
}

impl AppBuilder {
	pub fn new() -> Self {
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder { opts: AppBuilderOpts::default() }
	}

	// Opts
	pub fn mode(&mut self, mode: ServerMode) -> &mut Self {
		self.opts.mode = mode;
		self
	}
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn origin(&mut self, origin: impl Into<Box<str>>) -> &mut Self {
		self.opts.origin = Some(origin.into());
		self
	}
	pub fn origin_timeout(&mut self, timeout: Duration) -> &mut Self {
		self.opts.origin_timeout = timeout;
		self
	}
	pub fn config_path(&mut self, path: impl Into<Box<Path>>) -> &mut Self {
		self.opts.config_path = Some(path.into());
		self
	}
	pub fn admin_key(&mut self, key: impl Into<Box<str>>) -> &mut Self {
		self.opts.admin_key = Some(key.into());
		self
	}
	pub fn region_header(&mut self, header: impl Into<Box<str>>) -> &mut Self {
		self.opts.region_header = header.into();
		self
	}
	pub fn limiter(&mut self, limiter: LimiterConfig) -> &mut Self {
		self.opts.limiter = limiter;
		self
	}
	pub fn sweep_interval(&mut self, interval: Duration) -> &mut Self {
		self.opts.sweep_interval = interval;
		self
	}

	pub fn opts(&self) -> &AppBuilderOpts {
		&self.opts
	}

	pub fn build(self) -> EgResult<App> {
		Ok(Arc::new(AppState::new(self.opts)?))
	}

	pub async fn run(self) -> EgResult<()> {
		let app = self.build()?;
		info!("edgegate {} starting in {:?} mode", VERSION, app.opts.mode);
		if app.origin.is_none() {
			warn!("No origin configured, passed requests will get 502");
		}

		spawn_sweeper(app.clone());

		let router = routes::init(app.clone());
		let listener = TcpListener::bind(&*app.opts.listen).await?;
		info!("Listening on HTTP {}", app.opts.listen);

		axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
			.with_graceful_shutdown(shutdown_signal())
			.await?;

		info!("Shut down");
		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Background compaction of expired rate limit entries
fn spawn_sweeper(app: App) {
	let period = app.opts.sweep_interval;
	if period.is_zero() {
		return;
	}
	tokio::spawn(async move {
		let mut interval = tokio::time::interval(period);
		interval.tick().await;
		loop {
			interval.tick().await;
			let removed = app.engine.limiter().sweep(Utc::now());
			let stats = app.engine.limiter().stats();
			debug!("Sweep removed {} entries, {} keys tracked", removed, stats.tracked_keys);
		}
	});
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		error!("Failed to listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
}


// vim: ts=4
