use crate::api::access::{Access, AccessTarget, access_level};
use crate::api::albums::error::AlbumError;
use crate::api::albums::interfaces::{
    AlbumDetailResponse, AlbumResponse, CreateAlbumRequest, UpdateAlbumRequest,
};
use crate::api::auth::interfaces::UserSummary;
use crate::api::pagination::{Page, Paginated};
use crate::api::photos::interfaces::PhotoResponse;
use crate::database::DbError;
use crate::database::album::Album;
use crate::database::album_store::AlbumStore;
use crate::database::collaboration::SharedItem;
use crate::database::photo_store::PhotoStore;
use crate::database::user_store::UserStore;
use crate::storage::ObjectStorage;
use color_eyre::eyre::eyre;
use sqlx::SqlitePool;
use tracing::{info, instrument};

pub const MAX_ALBUM_NAME_LENGTH: usize = 255;

/// Trims and checks an album name.
fn validate_name(name: &str) -> Result<String, AlbumError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AlbumError::BadRequest("Album name may not be blank.".to_owned()));
    }
    if name.chars().count() > MAX_ALBUM_NAME_LENGTH {
        return Err(AlbumError::BadRequest(format!(
            "Album name may not be longer than {MAX_ALBUM_NAME_LENGTH} characters."
        )));
    }
    Ok(name.to_owned())
}

/// A cover must be a photo the user can see.
async fn validate_cover(
    pool: &SqlitePool,
    user_id: i64,
    cover_photo_id: i64,
) -> Result<(), AlbumError> {
    if PhotoStore::is_visible_to(pool, user_id, cover_photo_id).await? {
        Ok(())
    } else {
        Err(AlbumError::BadRequest(format!(
            "Invalid cover photo {cover_photo_id}."
        )))
    }
}

/// Loads an album the user can at least view. Invisible albums are reported as not found.
pub(crate) async fn load_visible_album(
    pool: &SqlitePool,
    user_id: i64,
    album_id: i64,
) -> Result<(Album, Access), AlbumError> {
    let album = AlbumStore::find_by_id(pool, album_id)
        .await?
        .ok_or_else(|| AlbumError::NotFound(album_id.to_string()))?;
    let target = AccessTarget {
        item: SharedItem::Album(album.id),
        owner_id: album.user_id,
    };
    let access = access_level(pool, user_id, target).await?;
    if !access.can_view() {
        return Err(AlbumError::NotFound(album_id.to_string()));
    }
    Ok((album, access))
}

async fn load_owned_album(
    pool: &SqlitePool,
    user_id: i64,
    album_id: i64,
) -> Result<Album, AlbumError> {
    let (album, _) = load_visible_album(pool, user_id, album_id).await?;
    if album.user_id != user_id {
        return Err(AlbumError::Forbidden(
            "Only the owner can modify this album.".to_owned(),
        ));
    }
    Ok(album)
}

async fn load_editable_album(
    pool: &SqlitePool,
    user_id: i64,
    album_id: i64,
) -> Result<Album, AlbumError> {
    let (album, access) = load_visible_album(pool, user_id, album_id).await?;
    if !access.can_edit() {
        return Err(AlbumError::Forbidden(
            "You do not have permission to edit this album.".to_owned(),
        ));
    }
    Ok(album)
}

/// Maps an album row to its list view, loading the cover photo and the photo count.
pub(crate) async fn album_response(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    album: Album,
) -> Result<AlbumResponse, DbError> {
    let cover_photo = match album.cover_photo_id {
        Some(cover_id) => PhotoStore::find_by_id(pool, cover_id)
            .await?
            .map(|photo| PhotoResponse::from_photo(photo, storage)),
        None => None,
    };
    let photo_count = AlbumStore::photo_count(pool, album.id).await?;
    Ok(AlbumResponse {
        id: album.id,
        name: album.name,
        description: album.description,
        cover_photo,
        photo_count,
        created_at: album.created_at,
        updated_at: album.updated_at,
    })
}

async fn album_detail(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    album: Album,
) -> Result<AlbumDetailResponse, AlbumError> {
    let owner = UserStore::find_by_id(pool, album.user_id)
        .await?
        .ok_or_else(|| eyre!("owner {} of album {} is missing", album.user_id, album.id))?;
    let photos = AlbumStore::list_photos(pool, album.id)
        .await?
        .into_iter()
        .map(|photo| PhotoResponse::from_photo(photo, storage))
        .collect();
    Ok(AlbumDetailResponse {
        album: album_response(pool, storage, album).await?,
        photos,
        user: UserSummary::from(&owner),
    })
}

#[instrument(skip(pool, storage))]
pub async fn list_albums(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    page: Page,
) -> Result<Paginated<AlbumResponse>, AlbumError> {
    let albums = AlbumStore::list_accessible(pool, user_id, page.limit, page.offset).await?;
    let count = AlbumStore::count_accessible(pool, user_id).await?;
    let mut results = Vec::with_capacity(albums.len());
    for album in albums {
        results.push(album_response(pool, storage, album).await?);
    }
    Ok(Paginated::new(results, count, page))
}

#[instrument(skip(pool, storage))]
pub async fn create_album(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    payload: CreateAlbumRequest,
) -> Result<AlbumResponse, AlbumError> {
    let name = validate_name(&payload.name)?;
    if let Some(cover_id) = payload.cover_photo_id {
        validate_cover(pool, user_id, cover_id).await?;
    }
    let album = AlbumStore::create(
        pool,
        user_id,
        &name,
        &payload.description,
        payload.cover_photo_id,
    )
    .await?;
    info!("User {user_id} created album {}", album.id);
    Ok(album_response(pool, storage, album).await?)
}

/// Fetches an album with its photos and owner. Requires view access.
#[instrument(skip(pool, storage))]
pub async fn get_album_details(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    album_id: i64,
) -> Result<AlbumDetailResponse, AlbumError> {
    let (album, _) = load_visible_album(pool, user_id, album_id).await?;
    album_detail(pool, storage, album).await
}

/// Updates name, description or cover. Owner only.
#[instrument(skip(pool, storage))]
pub async fn update_album(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    album_id: i64,
    payload: UpdateAlbumRequest,
) -> Result<AlbumResponse, AlbumError> {
    let album = load_owned_album(pool, user_id, album_id).await?;
    let name = payload.name.as_deref().map(validate_name).transpose()?;
    if let Some(Some(cover_id)) = payload.cover_photo_id {
        validate_cover(pool, user_id, cover_id).await?;
    }
    let updated = AlbumStore::update(
        pool,
        album.id,
        name.as_deref(),
        payload.description.as_deref(),
        payload.cover_photo_id,
    )
    .await?;
    Ok(album_response(pool, storage, updated).await?)
}

/// Deletes an album. Owner only. The photos in it are kept.
#[instrument(skip(pool))]
pub async fn delete_album(pool: &SqlitePool, user_id: i64, album_id: i64) -> Result<(), AlbumError> {
    let album = load_owned_album(pool, user_id, album_id).await?;
    AlbumStore::delete(pool, album.id).await?;
    info!("User {user_id} deleted album {album_id}");
    Ok(())
}

/// Attaches photos to an album. Requires edit access on the album.
///
/// Photos the user cannot see are skipped without error, as are photos already attached.
#[instrument(skip(pool, storage))]
pub async fn add_photos_to_album(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    album_id: i64,
    photo_ids: &[i64],
) -> Result<AlbumDetailResponse, AlbumError> {
    let album = load_editable_album(pool, user_id, album_id).await?;
    let added = AlbumStore::add_photos(pool, album.id, user_id, photo_ids).await?;
    info!(
        "User {user_id} added {added} of {} photos to album {album_id}",
        photo_ids.len()
    );
    album_detail(pool, storage, album).await
}

/// Detaches photos from an album. Requires edit access on the album.
#[instrument(skip(pool, storage))]
pub async fn remove_photos_from_album(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    album_id: i64,
    photo_ids: &[i64],
) -> Result<AlbumDetailResponse, AlbumError> {
    let album = load_editable_album(pool, user_id, album_id).await?;
    let removed = AlbumStore::remove_photos(pool, album.id, photo_ids).await?;
    info!("User {user_id} removed {removed} photos from album {album_id}");
    album_detail(pool, storage, album).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn album_names_are_trimmed_and_bounded() {
        assert_eq!(validate_name("  Summer  ").expect("valid"), "Summer");
        assert!(matches!(validate_name("   "), Err(AlbumError::BadRequest(_))));
        assert!(validate_name(&"a".repeat(MAX_ALBUM_NAME_LENGTH)).is_ok());
        assert!(matches!(
            validate_name(&"a".repeat(MAX_ALBUM_NAME_LENGTH + 1)),
            Err(AlbumError::BadRequest(_))
        ));
    }
}
