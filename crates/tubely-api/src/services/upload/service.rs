//! Upload pipeline
//!
//! authorize → select part → validate type → stage → (probe → remux) → store → persist.
//!
//! Ownership is checked before any body byte is read, so a rejected request never
//! writes a staging file or an object.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Multipart;
use tokio::io::AsyncRead;
use tubely_core::{AppError, AssetClass, Video};
use tubely_processing::{StagedFile, ValidatedMedia};
use tubely_storage::generate_key;
use uuid::Uuid;

use crate::services::{present_video, AssetRecordUpdater};
use crate::state::AppState;
use crate::utils::upload::{field_reader, missing_part, multipart_error, staging_error};

pub struct UploadService {
    state: Arc<AppState>,
}

impl UploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Run the whole pipeline for one multipart request and return the updated video
    /// with access URLs materialized.
    #[tracing::instrument(skip(self, multipart), fields(video_id = %video_id, class = %class))]
    pub async fn upload(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        class: AssetClass,
        mut multipart: Multipart,
    ) -> Result<Video, AppError> {
        let start = Instant::now();
        let records = AssetRecordUpdater::new(self.state.db.videos.clone());
        records.authorize(video_id, user_id).await?;

        // Parts before the expected one are skipped unread.
        let expected = class.form_field();
        let reference = loop {
            let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| multipart_error(&e))?
            else {
                return Err(missing_part(expected));
            };
            if field.name() != Some(expected) {
                continue;
            }

            let media = self
                .state
                .media
                .validator
                .validate(field.content_type(), class)?;
            break self.store_asset(class, &media, field_reader(field)).await?;
        };

        let video = records.attach(video_id, user_id, class, reference).await?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload completed"
        );

        present_video(&self.state.storage, video).await
    }

    /// Stage `body`, transform it if it is a video, and write it to the store for
    /// `class`. Returns the reference to persist.
    ///
    /// Every scratch file created here is removed before returning, on success and on
    /// every error path.
    pub async fn store_asset<R>(
        &self,
        class: AssetClass,
        media: &ValidatedMedia,
        body: R,
    ) -> Result<String, AppError>
    where
        R: AsyncRead + Unpin,
    {
        let limit = match class {
            AssetClass::Thumbnail => self.state.media.max_thumbnail_bytes,
            AssetClass::Video => self.state.media.max_upload_bytes,
        };
        let staged = self
            .state
            .media
            .staging
            .stage(body, limit)
            .await
            .map_err(staging_error)?;

        match class {
            AssetClass::Thumbnail => {
                let key = generate_key(&media.extension, None)?;
                self.put(class, &key, &media.media_type, &staged).await
            }
            AssetClass::Video => {
                let transformer = &self.state.media.transformer;
                let orientation = transformer.classify_aspect_ratio(&staged).await?;
                let processed = transformer.remux_for_progressive_playback(&staged).await?;

                let key = generate_key(&media.extension, Some(orientation.as_str()))?;
                self.put(class, &key, &media.media_type, &processed).await
            }
        }
    }

    async fn put(
        &self,
        class: AssetClass,
        key: &str,
        content_type: &str,
        file: &StagedFile,
    ) -> Result<String, AppError> {
        let store = match class {
            AssetClass::Thumbnail => &self.state.storage.thumbnails,
            AssetClass::Video => &self.state.storage.videos,
        };

        let reader = file.open().await?;
        let size = store.put_stream(key, content_type, Box::pin(reader)).await?;

        tracing::debug!(
            key = %key,
            size_bytes = size,
            backend = %store.backend_type(),
            "Asset stored"
        );

        Ok(store.locator_for(key)?)
    }
}
