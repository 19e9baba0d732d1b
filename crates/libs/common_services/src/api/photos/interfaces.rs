use crate::api::auth::interfaces::UserSummary;
use crate::database::photo::Photo;
use crate::storage::ObjectStorage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// --- Responses ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoResponse {
    pub id: i64,
    /// Public url of the image.
    pub image: String,
    pub format: String,
    pub is_bookmarked: bool,
    #[schema(value_type = Object)]
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PhotoResponse {
    #[must_use]
    pub fn from_photo(photo: Photo, storage: &dyn ObjectStorage) -> Self {
        Self {
            id: photo.id,
            image: storage.url(&photo.image),
            format: photo.format,
            is_bookmarked: photo.is_bookmarked,
            metadata: photo.metadata.0,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
        }
    }
}

/// A photo with its owner, returned when retrieving a single photo.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoDetailResponse {
    #[serde(flatten)]
    pub photo: PhotoResponse,
    pub user: UserSummary,
}

// --- Requests ---

/// A file pulled out of a multipart upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Parsed multipart upload of one or more images sharing the same attributes.
#[derive(Debug, Clone, Default)]
pub struct PhotoUpload {
    pub images: Vec<ImageFile>,
    pub is_bookmarked: bool,
    pub metadata: Value,
}

/// Documents the multipart body of `POST /api/photos`.
#[derive(Debug, ToSchema)]
pub struct UploadPhotoForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    pub is_bookmarked: Option<bool>,
    /// JSON object, sent as text.
    pub metadata: Option<String>,
}

/// Documents the multipart body of `POST /api/photos/bulk`.
#[derive(Debug, ToSchema)]
pub struct BulkUploadForm {
    #[schema(value_type = Vec<String>, format = Binary)]
    pub images: Vec<Vec<u8>>,
    pub is_bookmarked: Option<bool>,
    pub metadata: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePhotoRequest {
    pub is_bookmarked: Option<bool>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Value>,
}
