//! Ownership checks and reference updates on video records.

use std::sync::Arc;

use tubely_core::{AppError, AssetClass, Video};
use tubely_db::VideoStore;
use uuid::Uuid;

pub struct AssetRecordUpdater {
    videos: Arc<dyn VideoStore>,
}

impl AssetRecordUpdater {
    pub fn new(videos: Arc<dyn VideoStore>) -> Self {
        Self { videos }
    }

    /// Load `video_id` and require that `user_id` owns it.
    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        let video = self
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        if !video.is_owned_by(user_id) {
            tracing::debug!(video_id = %video_id, user_id = %user_id, "Upload rejected: not the owner");
            return Err(AppError::Forbidden(
                "Only the owner of this video can change it".to_string(),
            ));
        }

        Ok(video)
    }

    /// Store `reference` as the `class` asset of `video_id`.
    ///
    /// Called after the object is written. The record is re-read and ownership
    /// re-checked so a concurrent change to the record is not overwritten with stale
    /// fields. If the update itself fails, the object stays in storage unreferenced and
    /// the error carries its locator.
    pub async fn attach(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        class: AssetClass,
        reference: String,
    ) -> Result<Video, AppError> {
        let mut video = self.authorize(video_id, user_id).await.map_err(|e| {
            tracing::error!(
                video_id = %video_id,
                locator = %reference,
                error = %e,
                "Stored asset is unreferenced: record lookup failed"
            );
            match e {
                AppError::NotFound(_) | AppError::Forbidden(_) => e,
                other => AppError::PersistFailed {
                    locator: reference.clone(),
                    message: other.to_string(),
                },
            }
        })?;

        video.set_asset_reference(class, reference.clone());

        if let Err(e) = self.videos.update_video(&video).await {
            tracing::error!(
                video_id = %video_id,
                class = %class,
                locator = %reference,
                error = %e,
                "Stored asset is unreferenced: record update failed"
            );
            return Err(AppError::PersistFailed {
                locator: reference,
                message: e.to_string(),
            });
        }

        tracing::info!(video_id = %video_id, class = %class, "Asset reference updated");
        Ok(video)
    }
}
