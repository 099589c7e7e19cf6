use edgegate::core::settings;
use edgegate::AppBuilder;
use tracing::error;

#[tokio::main]
async fn main() {
	let mut builder = AppBuilder::new();
	if let Err(err) = settings::apply_env(&mut builder, |name| std::env::var(name).ok()) {
		error!("Invalid settings: {}", err);
		std::process::exit(2);
	}

	if let Err(err) = builder.run().await {
		error!("Server failed: {}", err);
		std::process::exit(1);
	}
}

// vim: ts=4
