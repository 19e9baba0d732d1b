use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Album {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub cover_photo_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AlbumWithOwner {
    #[sqlx(flatten)]
    pub album: Album,
    pub username: String,
}
