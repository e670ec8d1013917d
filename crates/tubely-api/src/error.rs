//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain crates convert their
//! errors into [`AppError`], which renders here with a status derived from its
//! [`ErrorMetadata`] and a consistent JSON body.

use axum::{
    extract::multipart::MultipartRejection,
    extract::rejection::{JsonRejection, PathRejection},
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use tubely_core::{AppError, ErrorMetadata, LogLevel};
use tubely_processing::{StagingError, ToolError, ValidationError};
use tubely_storage::StorageError;
use utoipa::ToSchema;

use crate::auth::AuthError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether retrying the same request can succeed
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse.
///
/// `AppError` lives in tubely-core, so the orphan rule keeps `IntoResponse` off it.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl HttpAppError {
    pub fn app_error(&self) -> &AppError {
        &self.0
    }
}

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<StagingError> for HttpAppError {
    fn from(err: StagingError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<ToolError> for HttpAppError {
    fn from(err: ToolError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<AuthError> for HttpAppError {
    fn from(err: AuthError) -> Self {
        HttpAppError(err.into())
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::BadRequest(format!(
            "Expected a multipart/form-data body: {}",
            rejection.body_text()
        )))
    }
}

impl From<PathRejection> for HttpAppError {
    fn from(rejection: PathRejection) -> Self {
        HttpAppError(AppError::BadRequest(rejection.body_text()))
    }
}

/// JSON body extractor that answers with [`ErrorResponse`] on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type = error_type,
                "Error occurred"
            );
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| {
            let env = env.to_lowercase();
            env == "production" || env == "prod"
        })
        .unwrap_or(false)
}

fn error_body(app_error: &AppError, with_details: bool) -> ErrorResponse {
    ErrorResponse {
        error: app_error.client_message(),
        details: with_details.then(|| app_error.detailed_message()),
        error_type: with_details.then(|| app_error.error_type().to_string()),
        code: app_error.error_code().to_string(),
        recoverable: app_error.is_recoverable(),
        suggested_action: app_error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details never leave the process in production, nor for sensitive errors.
        let with_details = !is_production_env() && !app_error.is_sensitive();

        (status, Json(error_body(app_error, with_details))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_forbidden_renders_403() {
        let response =
            HttpAppError(AppError::Forbidden("Not your video".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_json(response).await;
        assert_eq!(body["code"], "FORBIDDEN");
        assert_eq!(body["error"], "Not your video");
        assert_eq!(body["recoverable"], false);
    }

    #[tokio::test]
    async fn test_tool_failure_hides_stderr() {
        let err: HttpAppError = ToolError::Remux {
            stderr: "/tmp/tubely-upload123: moov atom not found".to_string(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["code"], "MEDIA_TOOL_FAILURE");
        assert_eq!(body["error"], "Failed to process video (ffmpeg (faststart))");
        assert!(body.get("details").is_none());
        assert!(!body.to_string().contains("/tmp/"));
    }

    #[tokio::test]
    async fn test_persist_failure_is_distinct_from_storage_failure() {
        let persist = HttpAppError(AppError::PersistFailed {
            locator: "bucket,landscape/ab.mp4".to_string(),
            message: "connection reset".to_string(),
        })
        .into_response();
        let storage: HttpAppError = StorageError::UploadFailed("timeout".to_string()).into();
        let storage = storage.into_response();

        assert_eq!(body_json(persist).await["code"], "ASSET_PERSIST_FAILED");
        assert_eq!(body_json(storage).await["code"], "STORAGE_ERROR");
    }

    #[test]
    fn test_error_body_without_details() {
        let body = error_body(&AppError::NotFound("Video not found".to_string()), false);
        assert_eq!(body.code, "NOT_FOUND");
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
        assert_eq!(
            body.suggested_action.as_deref(),
            Some("Verify the resource ID exists")
        );
    }
}
