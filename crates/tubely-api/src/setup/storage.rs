//! Object store setup

use std::sync::Arc;

use anyhow::{Context, Result};
use tubely_core::Config;
use tubely_storage::{create_thumbnail_storage, create_video_storage, Storage};

/// Returns `(thumbnails, videos)`.
pub async fn setup_storage(config: &Config) -> Result<(Arc<dyn Storage>, Arc<dyn Storage>)> {
    let thumbnails = create_thumbnail_storage(config)
        .await
        .context("Failed to initialize thumbnail storage")?;
    let videos = create_video_storage(config)
        .await
        .context("Failed to initialize video storage")?;

    tracing::info!(
        thumbnails = %thumbnails.backend_type(),
        videos = %videos.backend_type(),
        "Storage initialized"
    );

    Ok((thumbnails, videos))
}
