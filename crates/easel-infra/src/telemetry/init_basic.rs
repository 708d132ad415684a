use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "easel=debug,tower_http=debug";

/// Initialize tracing: env filter plus either a human-readable or a JSON fmt layer
pub fn init_telemetry(json: bool, environment: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pretty_layer = (!json).then(tracing_subscriber::fmt::layer);
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(pretty_layer)
        .with(json_layer)
        .try_init()?;

    tracing::info!(environment = %environment, json, "Tracing initialized");
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
