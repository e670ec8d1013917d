//! Tubely Storage Library
//!
//! This crate provides the storage abstraction and its implementations: the local asset
//! directory and S3 (or any S3-compatible bucket).
//!
//! # Storage key format
//!
//! Keys are generated by the `keys` module and never derived from client filenames:
//!
//! - **Thumbnails**: `{hex}.{ext}`
//! - **Videos**: `{orientation}/{hex}.{ext}`
//!
//! `hex` is 64 lowercase hex digits encoding 32 random bytes. Keys contain neither `..`
//! nor `,`, so they can be joined with a bucket into a persisted locator.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_thumbnail_storage, create_video_storage};
pub use keys::generate_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{StagedReader, Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
