use axum_test::multipart::{MultipartForm, Part};
use chrono::Duration;
use tubely_api::auth::make_jwt;
use uuid::Uuid;

use super::TEST_JWT_SECRET;

pub fn bearer(user_id: Uuid) -> String {
    let token = make_jwt(user_id, TEST_JWT_SECRET, Duration::hours(1)).unwrap();
    format!("Bearer {}", token)
}

/// Eight bytes of PNG signature plus padding; content is never decoded.
pub fn png_bytes() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0u8; 24]);
    data
}

pub fn mp4_bytes() -> Vec<u8> {
    let mut data = vec![0, 0, 0, 0x18];
    data.extend_from_slice(b"ftypmp42");
    data.extend_from_slice(&[0u8; 52]);
    data
}

pub fn single_part(name: &str, data: Vec<u8>, file_name: &str, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        name.to_string(),
        Part::bytes(data).file_name(file_name).mime_type(mime),
    )
}
