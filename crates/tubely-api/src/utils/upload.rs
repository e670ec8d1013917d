//! Multipart plumbing for streaming uploads.

use std::io;

use axum::body::Bytes;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use futures::{Stream, TryStreamExt};
use tokio_util::io::StreamReader;
use tubely_core::AppError;
use tubely_processing::StagingError;

pub fn missing_part(name: &str) -> AppError {
    AppError::BadRequest(format!("Missing multipart part '{}'", name))
}

/// Reader over one part's bytes.
pub fn field_reader(
    field: Field<'_>,
) -> StreamReader<impl Stream<Item = Result<Bytes, io::Error>> + Send + Unpin + '_, Bytes> {
    StreamReader::new(Box::pin(field.map_err(io::Error::other)))
}

/// Map a multipart failure, keeping the body-limit case distinct.
pub fn multipart_error(err: &MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart body: {}", err.body_text()))
    }
}

/// Map a staging failure; a body limit hit mid-stream surfaces as a read error.
pub fn staging_error(err: StagingError) -> AppError {
    if let StagingError::Read(io_err) = &err {
        if let Some(multipart) = io_err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<MultipartError>())
        {
            return multipart_error(multipart);
        }
    }
    err.into()
}
