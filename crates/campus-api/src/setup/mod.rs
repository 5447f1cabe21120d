//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use campus_core::Config;
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    campus_infra::init_telemetry(config.log_json)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    config
        .validate()
        .context("Configuration validation failed")?;
    tracing::info!(environment = %config.environment, "Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;

    let storage = campus_storage::create_storage(&config)
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(backend = %storage.backend_type(), "Storage initialized");

    let limiters = services::SubmissionLimiters::from_config(&config);
    let cleanup_interval = Duration::from_secs(config.rate_limit.cleanup_interval_secs);
    if campus_infra::spawn_cleanup_task(limiters.all(), cleanup_interval).is_some() {
        tracing::info!(
            interval_secs = config.rate_limit.cleanup_interval_secs,
            "Rate limit cleanup task started"
        );
    }

    let state = services::initialize_services(&config, pool, storage, &limiters)?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
