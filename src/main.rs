use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rain_lamp::{config::Config, pipeline::RainLamp};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (missing file is fine, vars may come from the environment)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    info!(
        city_code = %config.city_code,
        device_id = %config.device_id,
        mode = ?config.lamp_mode,
        "Configuration loaded"
    );

    let lamp = RainLamp::new(&config)?;
    let ok = lamp.run().await;
    info!(success = ok, "Run finished");

    Ok(())
}
