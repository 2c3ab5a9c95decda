//! Humidity Hub - Binary Entry Point
//!
//! Loads `.env`, configures logging and runs the HTTP server.

use humidity_hub::api;
use humidity_hub::{HubResult, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> HubResult<()> {
    // Missing .env is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "humidity_hub=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        version = humidity_hub::VERSION,
        low = config.policy.low,
        high = config.policy.high,
        buffer = config.hub.channel_capacity,
        "starting humidity hub"
    );

    api::serve(config).await?;
    Ok(())
}
