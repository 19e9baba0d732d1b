use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A photo as shown on the homepage, tagged with its owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HomepagePhoto {
    pub id: i64,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub is_bookmarked: bool,
    pub format: String,
    pub username: String,
    /// Whether someone else owns this photo.
    pub is_shared: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HomepageAlbum {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub photo_count: i64,
    pub cover_image: Option<String>,
    pub username: String,
    pub is_shared: bool,
    /// Album photos, with the cover appended when it is not one of them.
    pub photos: Vec<HomepagePhoto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HomepageResponse {
    pub photos: Vec<HomepagePhoto>,
    pub albums: Vec<HomepageAlbum>,
}
