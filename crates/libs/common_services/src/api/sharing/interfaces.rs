use crate::api::albums::interfaces::AlbumResponse;
use crate::api::auth::interfaces::UserSummary;
use crate::api::photos::interfaces::PhotoResponse;
use crate::database::collaboration::{ContentType, Permission};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// --- Request Payloads ---

/// Grants another user access to one photo or album. Only the id matching
/// `content_type` is used.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCollaborationRequest {
    pub shared_with_email: String,
    pub content_type: ContentType,
    pub photo_id: Option<i64>,
    pub album_id: Option<i64>,
    #[serde(default)]
    pub permission: Permission,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCollaborationRequest {
    pub permission: Option<Permission>,
    pub message: Option<String>,
}

/// `?content_type=` filter, matched case-insensitively.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ContentTypeFilter {
    #[param(example = "PHOTO")]
    pub content_type: Option<String>,
}

/// What a [`ContentTypeFilter`] selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTypeScope {
    All,
    Only(ContentType),
    /// An unknown content type, which no grant has.
    Nothing,
}

impl ContentTypeFilter {
    #[must_use]
    pub fn scope(&self) -> ContentTypeScope {
        match self.content_type.as_deref().map(str::trim) {
            None | Some("") => ContentTypeScope::All,
            Some(value) => value
                .parse()
                .map_or(ContentTypeScope::Nothing, ContentTypeScope::Only),
        }
    }
}

// --- Responses ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollaborationResponse {
    pub id: i64,
    pub shared_by: UserSummary,
    pub shared_with: UserSummary,
    pub message: String,
    pub content_type: ContentType,
    pub photo: Option<PhotoResponse>,
    pub album: Option<AlbumResponse>,
    pub permission: Permission,
    pub created_at: DateTime<Utc>,
}
