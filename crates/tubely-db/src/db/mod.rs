//! Database repositories for data access layer

pub mod memory;
pub mod video;

use async_trait::async_trait;
use tubely_core::{AppError, AssetClass, Video};
use uuid::Uuid;

pub use memory::InMemoryVideoRepository;
pub use video::PgVideoRepository;

/// A persisted asset reference and the record holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    pub video_id: Uuid,
    pub class: AssetClass,
    pub reference: String,
}

/// Key/value access to video records.
///
/// Updates replace the whole record; concurrent writers are last-write-wins.
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn create_video(&self, video: &Video) -> Result<(), AppError>;

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Fails with `NotFound` if the record no longer exists.
    async fn update_video(&self, video: &Video) -> Result<(), AppError>;

    /// Every non-empty asset reference across all records.
    async fn list_asset_references(&self) -> Result<Vec<AssetReference>, AppError>;
}

pub(crate) fn references_of(video: &Video) -> impl Iterator<Item = AssetReference> + '_ {
    [AssetClass::Thumbnail, AssetClass::Video]
        .into_iter()
        .filter_map(move |class| {
            video.asset_reference(class).map(|reference| AssetReference {
                video_id: video.id,
                class,
                reference: reference.to_string(),
            })
        })
}
