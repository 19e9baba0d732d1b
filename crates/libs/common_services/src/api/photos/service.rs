use crate::api::access::{Access, AccessTarget, access_level};
use crate::api::auth::interfaces::UserSummary;
use crate::api::pagination::{Page, Paginated};
use crate::api::photos::error::PhotoError;
use crate::api::photos::interfaces::{
    ImageFile, PhotoDetailResponse, PhotoResponse, PhotoUpload, UpdatePhotoRequest,
};
use crate::database::collaboration::SharedItem;
use crate::database::photo::Photo;
use crate::database::photo_store::PhotoStore;
use crate::database::user_store::UserStore;
use crate::storage::{ObjectStorage, photo_object_key};
use crate::utils::image_format;
use app_state::constants;
use chrono::Utc;
use color_eyre::eyre::eyre;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument, warn};

/// Loads a photo the user can at least view. Invisible photos are reported as not found.
pub(crate) async fn load_visible_photo(
    pool: &SqlitePool,
    user_id: i64,
    photo_id: i64,
) -> Result<(Photo, Access), PhotoError> {
    let photo = PhotoStore::find_by_id(pool, photo_id)
        .await?
        .ok_or_else(|| PhotoError::NotFound(photo_id.to_string()))?;
    let target = AccessTarget {
        item: SharedItem::Photo(photo.id),
        owner_id: photo.user_id,
    };
    let access = access_level(pool, user_id, target).await?;
    if !access.can_view() {
        return Err(PhotoError::NotFound(photo_id.to_string()));
    }
    Ok((photo, access))
}

/// Loads a photo for modification. Only the owner may modify it.
async fn load_owned_photo(
    pool: &SqlitePool,
    user_id: i64,
    photo_id: i64,
) -> Result<Photo, PhotoError> {
    let (photo, _) = load_visible_photo(pool, user_id, photo_id).await?;
    if photo.user_id != user_id {
        return Err(PhotoError::Forbidden(
            "Only the owner can modify this photo.".to_owned(),
        ));
    }
    Ok(photo)
}

fn normalize_metadata(metadata: Value) -> Value {
    if metadata.is_null() { json!({}) } else { metadata }
}

/// Writes the image to storage and records it. The file is removed again if the insert fails.
async fn store_image(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    image: &ImageFile,
    format: &str,
    is_bookmarked: bool,
    metadata: &Value,
) -> Result<Photo, PhotoError> {
    let key = photo_object_key(Utc::now(), format, constants().storage.object_id_length);
    storage.put(&key, &image.bytes).await?;

    match PhotoStore::create(pool, user_id, &key, format, is_bookmarked, metadata).await {
        Ok(photo) => Ok(photo),
        Err(e) => {
            if let Err(cleanup) = storage.delete(&key).await {
                warn!("Could not remove orphaned object {key}: {cleanup}");
            }
            Err(e.into())
        }
    }
}

#[instrument(skip(pool, storage))]
pub async fn list_photos(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    page: Page,
) -> Result<Paginated<PhotoResponse>, PhotoError> {
    let photos = PhotoStore::list_accessible(pool, user_id, page.limit, page.offset).await?;
    let count = PhotoStore::count_accessible(pool, user_id).await?;
    let results = photos
        .into_iter()
        .map(|photo| PhotoResponse::from_photo(photo, storage))
        .collect();
    Ok(Paginated::new(results, count, page))
}

/// Stores a single uploaded image for the user.
#[instrument(skip(pool, storage, upload), fields(images = upload.images.len()))]
pub async fn upload_photo(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    upload: PhotoUpload,
) -> Result<PhotoResponse, PhotoError> {
    let image = upload
        .images
        .first()
        .ok_or_else(|| PhotoError::BadRequest("No image was submitted.".to_owned()))?;
    if image.bytes.is_empty() {
        return Err(PhotoError::BadRequest(
            "The submitted image is empty.".to_owned(),
        ));
    }
    let format = image_format(&image.file_name).ok_or_else(|| {
        PhotoError::BadRequest(format!(
            "'{}' is not a supported image file.",
            image.file_name
        ))
    })?;

    let metadata = normalize_metadata(upload.metadata);
    let photo = store_image(
        pool,
        storage,
        user_id,
        image,
        &format,
        upload.is_bookmarked,
        &metadata,
    )
    .await?;
    info!("User {user_id} uploaded photo {}", photo.id);
    Ok(PhotoResponse::from_photo(photo, storage))
}

/// Stores every valid image in the upload. Files that are not images are skipped.
#[instrument(skip(pool, storage, upload), fields(images = upload.images.len()))]
pub async fn bulk_upload(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    upload: PhotoUpload,
) -> Result<Vec<PhotoResponse>, PhotoError> {
    if upload.images.is_empty() {
        return Err(PhotoError::BadRequest("No images were submitted.".to_owned()));
    }
    let metadata = normalize_metadata(upload.metadata);

    let mut created = Vec::with_capacity(upload.images.len());
    for image in &upload.images {
        let Some(format) = image_format(&image.file_name).filter(|_| !image.bytes.is_empty())
        else {
            debug!("Skipping '{}', not a valid image.", image.file_name);
            continue;
        };
        let photo = store_image(
            pool,
            storage,
            user_id,
            image,
            &format,
            upload.is_bookmarked,
            &metadata,
        )
        .await?;
        created.push(PhotoResponse::from_photo(photo, storage));
    }
    info!(
        "User {user_id} bulk uploaded {} of {} images",
        created.len(),
        upload.images.len()
    );
    Ok(created)
}

#[instrument(skip(pool, storage))]
pub async fn get_photo(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    photo_id: i64,
) -> Result<PhotoDetailResponse, PhotoError> {
    let (photo, _) = load_visible_photo(pool, user_id, photo_id).await?;
    let owner = UserStore::find_by_id(pool, photo.user_id)
        .await?
        .ok_or_else(|| eyre!("owner {} of photo {photo_id} is missing", photo.user_id))?;
    Ok(PhotoDetailResponse {
        photo: PhotoResponse::from_photo(photo, storage),
        user: UserSummary::from(&owner),
    })
}

#[instrument(skip(pool, storage))]
pub async fn update_photo(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    photo_id: i64,
    payload: UpdatePhotoRequest,
) -> Result<PhotoResponse, PhotoError> {
    let photo = load_owned_photo(pool, user_id, photo_id).await?;
    let updated = PhotoStore::update(
        pool,
        photo.id,
        payload.is_bookmarked,
        payload.metadata.as_ref(),
    )
    .await?;
    Ok(PhotoResponse::from_photo(updated, storage))
}

/// Deletes a photo and its stored file. Grants on it and album memberships go with it.
#[instrument(skip(pool, storage))]
pub async fn delete_photo(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    photo_id: i64,
) -> Result<(), PhotoError> {
    let photo = load_owned_photo(pool, user_id, photo_id).await?;
    PhotoStore::delete(pool, photo.id).await?;
    if let Err(e) = storage.delete(&photo.image).await {
        warn!("Photo {photo_id} deleted but its file {} remains: {e}", photo.image);
    }
    info!("User {user_id} deleted photo {photo_id}");
    Ok(())
}

#[instrument(skip(pool, storage))]
pub async fn list_bookmarked(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
) -> Result<Vec<PhotoResponse>, PhotoError> {
    let photos = PhotoStore::list_accessible_bookmarked(pool, user_id).await?;
    Ok(photos
        .into_iter()
        .map(|photo| PhotoResponse::from_photo(photo, storage))
        .collect())
}
