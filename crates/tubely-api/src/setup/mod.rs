//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use tubely_core::Config;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment())?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let videos = database::setup_video_store(&config).await?;

    let (thumbnails, video_objects) = storage::setup_storage(&config).await?;

    let state = services::initialize_state(&config, videos, thumbnails, video_objects).await?;

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
