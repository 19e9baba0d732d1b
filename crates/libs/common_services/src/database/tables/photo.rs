use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;

/// A stored photo. `image` is the object storage key, not a url.
#[derive(Debug, Clone, FromRow)]
pub struct Photo {
    pub id: i64,
    pub user_id: i64,
    pub image: String,
    pub format: String,
    pub is_bookmarked: bool,
    pub metadata: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A photo joined with its owner's username, used by list views that show who owns what.
#[derive(Debug, Clone, FromRow)]
pub struct PhotoWithOwner {
    #[sqlx(flatten)]
    pub photo: Photo,
    pub username: String,
}
