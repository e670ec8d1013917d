#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::path::PathBuf;
use std::sync::Arc;
#[cfg(feature = "storage-s3")]
use std::time::Duration;
use tubely_core::Config;

/// Subdirectory of the asset root (and path segment of its base URL) holding videos
/// when they are stored locally.
pub const LOCAL_VIDEO_DIR: &str = "videos";

/// Create the store that receives thumbnails.
///
/// Thumbnails are public and always live in the local asset directory.
pub async fn create_thumbnail_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    create_local(
        config.assets_root().clone(),
        config.assets_base_url().to_string(),
    )
    .await
}

/// Create the store that receives videos, selected by `VIDEO_STORAGE_BACKEND`.
pub async fn create_video_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.video_storage_backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let mut storage = S3Storage::new(bucket, region, endpoint).await?;
            if config.s3_presign() {
                storage = storage
                    .with_presigned_urls(Duration::from_secs(config.presign_expiry_secs()));
            }

            tracing::info!(
                bucket = %storage.bucket(),
                presign = config.s3_presign(),
                "Video storage: S3"
            );
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        StorageBackend::Local => {
            let root = config.assets_root().join(LOCAL_VIDEO_DIR);
            let base_url = format!(
                "{}/{}",
                config.assets_base_url().trim_end_matches('/'),
                LOCAL_VIDEO_DIR
            );
            tracing::info!(root = %root.display(), "Video storage: local");
            create_local(root, base_url).await
        }
    }
}

#[cfg(feature = "storage-local")]
async fn create_local(root: PathBuf, base_url: String) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(root, base_url).await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-local"))]
async fn create_local(_root: PathBuf, _base_url: String) -> StorageResult<Arc<dyn Storage>> {
    Err(StorageError::ConfigError(
        "Local storage backend not available (storage-local feature not enabled)".to_string(),
    ))
}
