//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::Result;
use savanna_core::Config;
use savanna_db::{seed_default_settings, PgRegistry, RegistryStore};

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(&config.environment)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");
    if !config.vendor_configured() {
        tracing::warn!(
            "CLOUDINARY_NAME, CLOUDINARY_API_KEY or CLOUDINARY_API_SECRET not set; uploads will be refused"
        );
    }

    let pool = database::setup_database(&config).await?;
    let store: Arc<dyn RegistryStore> = Arc::new(PgRegistry::new(pool));
    seed_default_settings(store.as_ref()).await?;

    let state = Arc::new(AppState::new(config.clone(), store)?);
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
