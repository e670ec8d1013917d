//! Stand-ins for ffprobe, ffmpeg, and failing record and object stores.

use std::path::Path;

use async_trait::async_trait;
use tubely_core::{AppError, Video};
use tubely_db::{AssetReference, InMemoryVideoRepository, VideoStore};
use tubely_processing::{MediaProbe, ProbeStream, Remuxer, ToolError};
use tubely_storage::{
    LocalStorage, StagedReader, Storage, StorageBackend, StorageError, StorageResult,
};
use uuid::Uuid;

/// Marker appended by [`MarkingRemuxer`] so tests can tell the remuxed file was stored.
pub const FASTSTART_MARKER: &[u8] = b"+faststart";

pub struct FixedProbe(pub Vec<ProbeStream>);

#[async_trait]
impl MediaProbe for FixedProbe {
    async fn probe_streams(&self, _path: &Path) -> Result<Vec<ProbeStream>, ToolError> {
        Ok(self.0.clone())
    }
}

pub struct FailingProbe;

#[async_trait]
impl MediaProbe for FailingProbe {
    async fn probe_streams(&self, _path: &Path) -> Result<Vec<ProbeStream>, ToolError> {
        Err(ToolError::Probe {
            stderr: "Invalid data found when processing input".to_string(),
        })
    }
}

pub struct MarkingRemuxer;

#[async_trait]
impl Remuxer for MarkingRemuxer {
    async fn remux_faststart(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        let mut data = tokio::fs::read(input).await.unwrap();
        data.extend_from_slice(FASTSTART_MARKER);
        tokio::fs::write(output, data).await.unwrap();
        Ok(())
    }
}

pub struct BrokenRemuxer;

#[async_trait]
impl Remuxer for BrokenRemuxer {
    async fn remux_faststart(&self, _input: &Path, output: &Path) -> Result<(), ToolError> {
        tokio::fs::write(output, b"partial").await.unwrap();
        Err(ToolError::Remux {
            stderr: "moov atom not found".to_string(),
        })
    }
}

/// Record store whose updates always fail.
#[derive(Default)]
pub struct UpdateFailsStore(pub InMemoryVideoRepository);

#[async_trait]
impl VideoStore for UpdateFailsStore {
    async fn create_video(&self, video: &Video) -> Result<(), AppError> {
        self.0.create_video(video).await
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        self.0.get_video(id).await
    }

    async fn update_video(&self, _video: &Video) -> Result<(), AppError> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn list_asset_references(&self) -> Result<Vec<AssetReference>, AppError> {
        self.0.list_asset_references().await
    }
}

/// Object store that rejects every write and delegates everything else.
pub struct PutFailsStorage(pub LocalStorage);

#[async_trait]
impl Storage for PutFailsStorage {
    async fn put_stream(
        &self,
        key: &str,
        _content_type: &str,
        _reader: StagedReader,
    ) -> StorageResult<u64> {
        Err(StorageError::UploadFailed(format!(
            "connection reset while writing {}",
            key
        )))
    }

    async fn url_for(&self, key: &str) -> StorageResult<String> {
        self.0.url_for(key).await
    }

    fn locator_for(&self, key: &str) -> StorageResult<String> {
        self.0.locator_for(key)
    }

    fn key_for_reference(&self, reference: &str) -> StorageResult<String> {
        self.0.key_for_reference(reference)
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.0.exists(key).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.0.delete(key).await
    }

    async fn list_keys(&self, prefix: Option<&str>) -> StorageResult<Vec<String>> {
        self.0.list_keys(prefix).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.0.backend_type()
    }
}
