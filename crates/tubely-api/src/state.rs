use std::sync::Arc;

use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_processing::{MediaValidator, StagingWriter, VideoTransformer};
use tubely_storage::Storage;

/// Shared application state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub jwt_secret: String,
    pub db: DbState,
    pub storage: StorageState,
    pub media: MediaState,
}

pub struct DbState {
    pub videos: Arc<dyn VideoStore>,
}

/// Object stores, one per asset class.
pub struct StorageState {
    pub thumbnails: Arc<dyn Storage>,
    pub videos: Arc<dyn Storage>,
}

pub struct MediaState {
    pub validator: MediaValidator,
    pub staging: StagingWriter,
    pub transformer: VideoTransformer,
    pub max_upload_bytes: u64,
    pub max_thumbnail_bytes: u64,
}
