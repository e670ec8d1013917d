//! Response view of a video record.

use tubely_core::{AppError, AssetClass, Video};

use crate::state::StorageState;

/// Replace persisted references with URLs a client can fetch now.
///
/// Public references come back unchanged; `bucket,key` locators become freshly signed
/// URLs. The record in the store is not touched.
pub async fn present_video(storage: &StorageState, mut video: Video) -> Result<Video, AppError> {
    for class in [AssetClass::Thumbnail, AssetClass::Video] {
        let Some(reference) = video.asset_reference(class) else {
            continue;
        };
        let store = match class {
            AssetClass::Thumbnail => &storage.thumbnails,
            AssetClass::Video => &storage.videos,
        };
        let url = store.access_url(reference).await?;
        match class {
            AssetClass::Thumbnail => video.thumbnail_url = Some(url),
            AssetClass::Video => video.video_url = Some(url),
        }
    }
    Ok(video)
}
