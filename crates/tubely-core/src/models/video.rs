use super::asset::AssetClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Video resource and its asset references.
///
/// `thumbnail_url` and `video_url` hold what was persisted: either a local asset URL or
/// a `bucket,key` locator. Responses replace locators with object or presigned URLs
/// before serialization; the record itself never stores a signed URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new(user_id: Uuid, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: description.into(),
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn asset_reference(&self, class: AssetClass) -> Option<&str> {
        match class {
            AssetClass::Thumbnail => self.thumbnail_url.as_deref(),
            AssetClass::Video => self.video_url.as_deref(),
        }
    }

    pub fn set_asset_reference(&mut self, class: AssetClass, reference: String) {
        match class {
            AssetClass::Thumbnail => self.thumbnail_url = Some(reference),
            AssetClass::Video => self.video_url = Some(reference),
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateVideoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}
