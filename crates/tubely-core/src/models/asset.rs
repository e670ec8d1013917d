use crate::constants::{
    THUMBNAIL_CONTENT_TYPES, THUMBNAIL_FORM_FIELD, VIDEO_CONTENT_TYPES, VIDEO_FORM_FIELD,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Category of uploaded media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Thumbnail,
    Video,
}

impl AssetClass {
    /// Name of the multipart part that carries this asset.
    pub fn form_field(&self) -> &'static str {
        match self {
            AssetClass::Thumbnail => THUMBNAIL_FORM_FIELD,
            AssetClass::Video => VIDEO_FORM_FIELD,
        }
    }

    pub fn allowed_content_types(&self) -> &'static [&'static str] {
        match self {
            AssetClass::Thumbnail => THUMBNAIL_CONTENT_TYPES,
            AssetClass::Video => VIDEO_CONTENT_TYPES,
        }
    }
}

impl Display for AssetClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AssetClass::Thumbnail => write!(f, "thumbnail"),
            AssetClass::Video => write!(f, "video"),
        }
    }
}

/// Coarse aspect-ratio classification of a video, used as a key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
