//! Test helpers: build AppState and router for integration tests.
//!
//! Records live in memory, both object stores are local directories and the media
//! tools are fakes, so the suite runs without Postgres, S3 or ffmpeg.

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;

use std::path::Path;
use std::sync::Arc;

use axum_test::TestServer;
use tempfile::TempDir;
use tubely_api::constants;
use tubely_api::setup::routes;
use tubely_api::state::{AppState, DbState, MediaState, StorageState};
use tubely_core::{BaseConfig, Config, IngestConfig, StorageBackend, Video};
use tubely_db::{InMemoryVideoRepository, VideoStore};
use tubely_processing::{
    MediaProbe, MediaValidator, ProbeStream, Remuxer, StagingWriter, VideoTransformer,
};
use tubely_storage::{LocalStorage, Storage};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const ASSETS_BASE_URL: &str = "http://localhost:8091/assets";
pub const VIDEOS_BASE_URL: &str = "http://localhost:8091/videos";

/// API path prefix for tests.
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Knobs a test can turn before the app is built.
pub struct TestOptions {
    pub videos: Arc<dyn VideoStore>,
    pub probe: Arc<dyn MediaProbe>,
    pub remuxer: Arc<dyn Remuxer>,
    pub max_upload_bytes: u64,
    pub max_thumbnail_bytes: u64,
    /// Wrap the video store so that every write fails.
    pub fail_video_writes: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            videos: Arc::new(InMemoryVideoRepository::new()),
            probe: Arc::new(fakes::FixedProbe(vec![ProbeStream::video(1280, 720)])),
            remuxer: Arc::new(fakes::MarkingRemuxer),
            max_upload_bytes: 1 << 20,
            max_thumbnail_bytes: 64 << 10,
            fail_video_writes: false,
        }
    }
}

/// Test application: server, state and the directories it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub assets_dir: TempDir,
    pub videos_dir: TempDir,
    pub staging_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn thumbnails(&self) -> &Arc<dyn Storage> {
        &self.state.storage.thumbnails
    }

    pub fn videos(&self) -> &Arc<dyn Storage> {
        &self.state.storage.videos
    }

    /// Create a draft video owned by `owner` directly in the record store.
    pub async fn seed_video(&self, owner: Uuid) -> Video {
        let video = Video::new(owner, "Boots", "A video about boots");
        self.state.db.videos.create_video(&video).await.unwrap();
        video
    }

    pub async fn stored_video(&self, id: Uuid) -> Video {
        self.state.db.videos.get_video(id).await.unwrap().unwrap()
    }

    pub fn staging_entries(&self) -> usize {
        count_entries(self.staging_dir.path())
    }
}

pub fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

fn test_config(
    assets_dir: &Path,
    staging_dir: &Path,
    max_upload_bytes: u64,
    max_thumbnail_bytes: u64,
) -> Config {
    Config::new(IngestConfig {
        base: BaseConfig {
            server_port: 8091,
            environment: "test".to_string(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            database_url: None,
            db_max_connections: 1,
            db_timeout_seconds: 5,
        },
        assets_root: assets_dir.to_path_buf(),
        assets_base_url: ASSETS_BASE_URL.to_string(),
        video_storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        s3_presign: false,
        presign_expiry_secs: 120,
        max_upload_bytes,
        max_thumbnail_bytes,
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        staging_dir: staging_dir.to_path_buf(),
    })
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let assets_dir = tempfile::tempdir().unwrap();
    let videos_dir = tempfile::tempdir().unwrap();
    let staging_dir = tempfile::tempdir().unwrap();

    let config = test_config(
        assets_dir.path(),
        staging_dir.path(),
        options.max_upload_bytes,
        options.max_thumbnail_bytes,
    );
    config.validate().unwrap();

    let thumbnails = LocalStorage::new(assets_dir.path(), ASSETS_BASE_URL.to_string())
        .await
        .unwrap();
    let videos = LocalStorage::new(videos_dir.path(), VIDEOS_BASE_URL.to_string())
        .await
        .unwrap();
    let videos: Arc<dyn Storage> = if options.fail_video_writes {
        Arc::new(fakes::PutFailsStorage(videos))
    } else {
        Arc::new(videos)
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        db: DbState {
            videos: options.videos,
        },
        storage: StorageState {
            thumbnails: Arc::new(thumbnails),
            videos,
        },
        media: MediaState {
            validator: MediaValidator::new(),
            staging: StagingWriter::new(staging_dir.path()),
            transformer: VideoTransformer::new(options.probe, options.remuxer),
            max_upload_bytes: options.max_upload_bytes,
            max_thumbnail_bytes: options.max_thumbnail_bytes,
        },
    });

    let router = routes::setup_routes(&config, state.clone());
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        state,
        assets_dir,
        videos_dir,
        staging_dir,
    }
}
