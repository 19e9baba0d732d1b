use crate::api::auth::interfaces::UserSummary;
use crate::api::photos::interfaces::PhotoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// --- Request Payloads ---

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateAlbumRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cover_photo_id: Option<i64>,
}

/// Partial album update. An explicit `"cover_photo_id": null` clears the cover,
/// leaving the field out keeps it.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateAlbumRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present_field")]
    #[schema(value_type = Option<i64>)]
    pub cover_photo_id: Option<Option<i64>>,
}

/// Maps a present field to `Some`, including a present `null`.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PhotoIdsRequest {
    pub photo_ids: Vec<i64>,
}

// --- Responses ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlbumResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub cover_photo: Option<PhotoResponse>,
    /// Attached photos, counting an unattached cover photo as one more.
    pub photo_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlbumDetailResponse {
    #[serde(flatten)]
    pub album: AlbumResponse,
    pub photos: Vec<PhotoResponse>,
    pub user: UserSummary,
}
