//! Configuration module
//!
//! Configuration is read once from the environment at startup and handed to each
//! component at construction time.

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_MAX_THUMBNAIL_BYTES, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PRESIGN_EXPIRY_SECS,
};
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

/// Ingestion pipeline configuration
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub base: BaseConfig,
    // Thumbnails are always written to the local asset directory
    pub assets_root: PathBuf,
    pub assets_base_url: String,
    // Video storage
    pub video_storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_presign: bool,
    pub presign_expiry_secs: u64,
    // Limits
    pub max_upload_bytes: u64,
    pub max_thumbnail_bytes: u64,
    // External tools
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub staging_dir: PathBuf,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IngestConfig>);

impl Config {
    pub fn new(config: IngestConfig) -> Self {
        Config(Box::new(config))
    }

    fn inner(&self) -> &IngestConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IngestConfig::from_env()?;
        Ok(Config::new(config))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().base.database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn assets_root(&self) -> &PathBuf {
        &self.inner().assets_root
    }

    pub fn assets_base_url(&self) -> &str {
        &self.inner().assets_base_url
    }

    pub fn video_storage_backend(&self) -> StorageBackend {
        self.inner().video_storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn s3_presign(&self) -> bool {
        self.inner().s3_presign
    }

    pub fn presign_expiry_secs(&self) -> u64 {
        self.inner().presign_expiry_secs
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.inner().max_upload_bytes
    }

    pub fn max_thumbnail_bytes(&self) -> u64 {
        self.inner().max_thumbnail_bytes
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    pub fn staging_dir(&self) -> &PathBuf {
        &self.inner().staging_dir
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let base = BaseConfig {
            server_port,
            environment,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
        };

        let video_storage_backend = match env::var("VIDEO_STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::S3,
        };

        let config = IngestConfig {
            assets_root: PathBuf::from(
                env::var("ASSETS_ROOT").unwrap_or_else(|_| "./assets".to_string()),
            ),
            assets_base_url: env::var("ASSETS_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}/assets", server_port))
                .trim_end_matches('/')
                .to_string(),
            video_storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            s3_presign: env::var("S3_PRESIGN")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
            presign_expiry_secs: env::var("PRESIGN_EXPIRY_SECS")
                .unwrap_or_else(|_| DEFAULT_PRESIGN_EXPIRY_SECS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PRESIGN_EXPIRY_SECS must be a valid number"))?,
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_BYTES must be a valid number"))?,
            max_thumbnail_bytes: env::var("MAX_THUMBNAIL_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_THUMBNAIL_BYTES.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_THUMBNAIL_BYTES must be a valid number"))?,
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            staging_dir: env::var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            base,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET must not be empty"));
        }

        if is_production_name(&self.base.environment)
            && self.base.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN
        {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long in production",
                MIN_PRODUCTION_SECRET_LEN
            ));
        }

        if let Some(url) = self.base.database_url.as_deref() {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        if self.max_upload_bytes == 0 || self.max_thumbnail_bytes == 0 {
            return Err(anyhow::anyhow!("Upload limits must be greater than zero"));
        }

        if self.max_thumbnail_bytes > self.max_upload_bytes {
            return Err(anyhow::anyhow!(
                "MAX_THUMBNAIL_BYTES cannot exceed MAX_UPLOAD_BYTES"
            ));
        }

        if self.video_storage_backend == StorageBackend::S3 {
            let bucket = self.s3_bucket.as_deref().unwrap_or_default();
            if bucket.is_empty() {
                return Err(anyhow::anyhow!(
                    "S3_BUCKET must be set when using S3 storage backend"
                ));
            }
            if bucket.contains(crate::locator::LOCATOR_DELIMITER) {
                return Err(anyhow::anyhow!("S3_BUCKET must not contain ','"));
            }
            if self.s3_region.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                ));
            }
            if self.s3_presign && self.presign_expiry_secs == 0 {
                return Err(anyhow::anyhow!("PRESIGN_EXPIRY_SECS must be greater than zero"));
            }
        }

        Ok(())
    }
}
