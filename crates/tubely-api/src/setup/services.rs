//! Assemble [`AppState`] from configuration and initialized backends.

use std::sync::Arc;

use anyhow::{Context, Result};
use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_processing::{
    FfmpegRemuxer, FfprobeProbe, MediaValidator, StagingWriter, VideoTransformer,
};
use tubely_storage::Storage;

use crate::state::{AppState, DbState, MediaState, StorageState};

pub async fn initialize_state(
    config: &Config,
    videos: Arc<dyn VideoStore>,
    thumbnail_storage: Arc<dyn Storage>,
    video_storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    tokio::fs::create_dir_all(config.staging_dir())
        .await
        .with_context(|| {
            format!(
                "Failed to create staging directory {}",
                config.staging_dir().display()
            )
        })?;

    let probe = FfprobeProbe::new(config.ffprobe_path())?;
    let remuxer = FfmpegRemuxer::new(config.ffmpeg_path())?;

    tracing::info!(
        ffprobe = %config.ffprobe_path(),
        ffmpeg = %config.ffmpeg_path(),
        staging_dir = %config.staging_dir().display(),
        "Media tools configured"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        jwt_secret: config.jwt_secret().to_string(),
        db: DbState { videos },
        storage: StorageState {
            thumbnails: thumbnail_storage,
            videos: video_storage,
        },
        media: MediaState {
            validator: MediaValidator::new(),
            staging: StagingWriter::new(config.staging_dir().clone()),
            transformer: VideoTransformer::new(Arc::new(probe), Arc::new(remuxer)),
            max_upload_bytes: config.max_upload_bytes(),
            max_thumbnail_bytes: config.max_thumbnail_bytes(),
        },
    }))
}
