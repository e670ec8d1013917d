//! Tubely API Library
//!
//! This crate provides the HTTP handlers, the upload pipeline that ties staging, media
//! tools, storage and records together, and application setup.

mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
pub mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
