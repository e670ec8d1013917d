//! Upload pipeline shared by the thumbnail and video endpoints.

pub mod service;

pub use service::UploadService;
