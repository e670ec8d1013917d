//! Tubely Core Library
//!
//! This crate provides the domain models, error types, configuration and locator
//! encoding shared by every Tubely component.

pub mod config;
pub mod constants;
pub mod error;
pub mod locator;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IngestConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use locator::{Locator, LocatorError, LOCATOR_DELIMITER};
pub use models::{AssetClass, Orientation, Video};
pub use storage_types::StorageBackend;
