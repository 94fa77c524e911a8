//! Carrier Gateway - shipping rates and labels over a carrier API
//!
//! This service quotes shipments against the carrier's rating API,
//! merging shop and ground-saver rates into one price-ordered list,
//! and creates shipments with printable labels.

use std::sync::Arc;

use tokio::net::TcpListener;

mod api;
mod auth;
mod carrier;
mod config;
mod domain;
mod engine;
mod error;
mod logging;

use crate::api::build_router;
use crate::auth::ApiKeyValidator;
use crate::carrier::{CarrierClient, ShipmentCreator, TokenProvider};
use crate::config::Config;
use crate::engine::RateAggregator;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Merges shop and ground-saver rates.
    pub aggregator: Arc<RateAggregator>,
    /// Creates shipments and labels.
    pub shipments: Arc<dyn ShipmentCreator>,
    /// Carrier token acquisition.
    pub tokens: Arc<dyn TokenProvider>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is expected in production
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    logging::init();

    tracing::info!("Starting Carrier Gateway v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        carrier = %config.carrier.base_url,
        negotiated_rates = config.carrier.account_number.is_some(),
        ground_saver_codes = ?config.carrier.ground_saver_codes,
        auth_enabled = %config.auth.enabled,
        "Configuration loaded"
    );

    let client = CarrierClient::new(config.carrier.clone()).map_err(|e| {
        tracing::error!(error = %e, "Failed to create carrier client");
        anyhow::anyhow!("Carrier client error: {}", e)
    })?;

    let aggregator = Arc::new(RateAggregator::new(
        Box::new(client.clone()),
        Box::new(client.clone()),
    ));

    let state = AppState {
        aggregator,
        shipments: Arc::new(client.clone()),
        tokens: Arc::new(client),
    };

    let validator = ApiKeyValidator::new(config.auth.api_keys.clone());
    if config.auth.enabled {
        tracing::info!(api_keys = validator.len(), "Authentication enabled");
    } else {
        tracing::warn!("Authentication is DISABLED - enable for production");
    }

    let app = build_router(state, config.auth.enabled, validator);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
