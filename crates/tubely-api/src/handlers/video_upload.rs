use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use tubely_core::{AssetClass, Video};

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::UploadService;
use crate::state::AppState;
use crate::utils::path::VideoId;

/// Upload the video file of an existing video.
///
/// The upload is probed for orientation and remuxed for fast start before it is
/// stored under `{orientation}/{random}.mp4`.
#[utoipa::path(
    post,
    path = "/api/video_upload/{videoID}",
    tag = "uploads",
    params(
        ("videoID" = String, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Part `video` (video/mp4)"),
    responses(
        (status = 200, description = "Video stored", body = Video),
        (status = 400, description = "Invalid ID, missing part or unsupported type", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Processing, storage or persistence failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    VideoId(video_id): VideoId,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let video = UploadService::new(&state)
        .upload(video_id, user.user_id, AssetClass::Video, multipart?)
        .await?;
    Ok(Json(video))
}
