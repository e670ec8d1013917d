use tubely_core::{AppError, AssetClass};

/// Content-type validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing Content-Type for the uploaded file")]
    MissingContentType,

    #[error("Malformed Content-Type: {0}")]
    MalformedContentType(String),

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// A declared media type that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMedia {
    /// Lowercase `type/subtype` without parameters.
    pub media_type: String,
    /// File extension used for the storage key.
    pub extension: String,
}

/// Media type allow-list check, run before any byte of the upload is persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaValidator;

impl MediaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate the content type declared on a multipart part for `class`.
    pub fn validate(
        &self,
        declared: Option<&str>,
        class: AssetClass,
    ) -> Result<ValidatedMedia, ValidationError> {
        let declared = declared
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingContentType)?;

        let media_type = normalize_mime_type(declared);
        let (kind, subtype) = media_type
            .split_once('/')
            .filter(|(kind, subtype)| is_token(kind) && is_token(subtype))
            .ok_or_else(|| ValidationError::MalformedContentType(declared.to_string()))?;

        let allowed = class.allowed_content_types();
        if !allowed.contains(&media_type.as_str()) {
            return Err(ValidationError::InvalidContentType {
                content_type: format!("{}/{}", kind, subtype),
                allowed: allowed.iter().map(|s| s.to_string()).collect(),
            });
        }

        Ok(ValidatedMedia {
            extension: subtype.to_string(),
            media_type,
        })
    }
}

/// Drop parameters (`; charset=...`) and normalize case.
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_types() {
        let validator = MediaValidator::new();

        let png = validator.validate(Some("image/png"), AssetClass::Thumbnail).unwrap();
        assert_eq!(png.media_type, "image/png");
        assert_eq!(png.extension, "png");

        let jpeg = validator
            .validate(Some("Image/JPEG; charset=binary"), AssetClass::Thumbnail)
            .unwrap();
        assert_eq!(jpeg.media_type, "image/jpeg");
        assert_eq!(jpeg.extension, "jpeg");

        for rejected in ["image/gif", "image/webp", "video/mp4", "text/plain"] {
            assert!(
                matches!(
                    validator.validate(Some(rejected), AssetClass::Thumbnail),
                    Err(ValidationError::InvalidContentType { .. })
                ),
                "{rejected}"
            );
        }
    }

    #[test]
    fn test_video_types() {
        let validator = MediaValidator::new();

        let mp4 = validator.validate(Some("video/mp4"), AssetClass::Video).unwrap();
        assert_eq!(mp4.extension, "mp4");

        for rejected in ["video/quicktime", "video/webm", "image/png"] {
            assert!(validator.validate(Some(rejected), AssetClass::Video).is_err());
        }
    }

    #[test]
    fn test_missing_or_malformed_content_type() {
        let validator = MediaValidator::new();

        assert_eq!(
            validator.validate(None, AssetClass::Video),
            Err(ValidationError::MissingContentType)
        );
        assert_eq!(
            validator.validate(Some("  "), AssetClass::Video),
            Err(ValidationError::MissingContentType)
        );
        for malformed in ["mp4", "video/", "/mp4", "video mp4"] {
            assert!(
                matches!(
                    validator.validate(Some(malformed), AssetClass::Video),
                    Err(ValidationError::MalformedContentType(_))
                ),
                "{malformed}"
            );
        }
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        use tubely_core::ErrorMetadata;
        let err: AppError = ValidationError::MissingContentType.into();
        assert_eq!(err.http_status_code(), 400);
    }
}
