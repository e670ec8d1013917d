//! Service-wide constants.

/// Multipart field carrying a thumbnail image.
pub const THUMBNAIL_FORM_FIELD: &str = "thumbnail";

/// Multipart field carrying a video file.
pub const VIDEO_FORM_FIELD: &str = "video";

/// Media types accepted for thumbnails.
pub const THUMBNAIL_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Media types accepted for videos.
pub const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4"];

/// Issuer expected in access tokens.
pub const JWT_ISSUER: &str = "tubely-access";

/// Validity window of presigned GET URLs.
///
/// Responses are not refreshed after they leave the server, so a client that caches a
/// video payload holds a link that stops working after this window.
pub const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 120;

/// Upper bound for a single upload request body (1 GiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1 << 30;

/// Upper bound for a thumbnail part (10 MiB).
pub const DEFAULT_MAX_THUMBNAIL_BYTES: u64 = 10 << 20;

/// Number of random bytes drawn for each storage key.
pub const STORAGE_KEY_RANDOM_BYTES: usize = 32;
