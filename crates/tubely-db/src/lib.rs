//! Tubely record store
//!
//! Video records are reached through the [`VideoStore`] trait. Postgres backs it in
//! production; the in-memory implementation serves local development and tests.

pub mod db;

pub use db::{AssetReference, InMemoryVideoRepository, PgVideoRepository, VideoStore};
