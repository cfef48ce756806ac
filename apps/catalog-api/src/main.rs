use axum_helpers::{BasicAuth, StaticCredentials, create_production_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::sync::Arc;
use tracing::info;

mod api;
mod config;
mod state;

use config::Config;
use state::{AppState, CatalogStore};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let store = CatalogStore::connect(&config.database).await?;

    // Hash the configured passwords once; requests only verify against them
    let verifier = StaticCredentials::from_accounts(&config.auth.accounts)
        .map_err(|e| eyre::eyre!("Failed to initialize credentials: {}", e))?;
    let auth = BasicAuth::new(Arc::new(verifier), &config.auth.realm)
        .map_err(|e| eyre::eyre!("Failed to initialize basic auth: {}", e))?;
    info!(
        accounts = config.auth.accounts.len(),
        realm = %config.auth.realm,
        "Basic authentication configured"
    );

    let state = AppState { config, store };

    let api_routes = api::routes(&state);
    let router = create_router(api_routes, state.config.app, auth, &state.config.cors);

    info!(
        "Starting {} v{} ({:?})",
        state.config.app.name, state.config.app.version, state.config.environment
    );

    let AppState { config, store } = state;

    // Production-ready server with graceful shutdown and cleanup
    create_production_app(router, &config.server, async move {
        info!("Shutting down: releasing catalog store");
        store.close().await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
