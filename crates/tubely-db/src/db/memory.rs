use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tubely_core::{AppError, Video};
use uuid::Uuid;

use super::{references_of, AssetReference, VideoStore};

/// Process-local video records, used when no `DATABASE_URL` is configured.
#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: RwLock<HashMap<Uuid, Video>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoStore for InMemoryVideoRepository {
    async fn create_video(&self, video: &Video) -> Result<(), AppError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&video.id) {
            return Err(AppError::InvalidInput(format!(
                "Video {} already exists",
                video.id
            )));
        }
        videos.insert(video.id, video.clone());
        Ok(())
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let mut videos = self.videos.write().await;
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Video {} not found", video.id))),
        }
    }

    async fn list_asset_references(&self) -> Result<Vec<AssetReference>, AppError> {
        let videos = self.videos.read().await;
        let mut references: Vec<AssetReference> =
            videos.values().flat_map(references_of).collect();
        references.sort_by(|a, b| a.reference.cmp(&b.reference));
        Ok(references)
    }
}
