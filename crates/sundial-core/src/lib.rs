pub mod config;

pub use config::{Config, RelayConfig, WeatherConfig};

use anyhow::Result;

/// Initialize logging for the process.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("sundial core initialized");
    Ok(())
}
