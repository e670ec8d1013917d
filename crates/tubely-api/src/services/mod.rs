pub mod asset_record;
pub mod presenter;
pub mod upload;

pub use asset_record::AssetRecordUpdater;
pub use presenter::present_video;
pub use upload::UploadService;
