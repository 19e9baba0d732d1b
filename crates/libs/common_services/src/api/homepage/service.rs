use crate::api::homepage::error::HomepageError;
use crate::api::homepage::interfaces::{HomepageAlbum, HomepagePhoto, HomepageResponse};
use crate::database::album::AlbumWithOwner;
use crate::database::album_store::AlbumStore;
use crate::database::photo::PhotoWithOwner;
use crate::database::photo_store::PhotoStore;
use crate::storage::ObjectStorage;
use app_state::constants;
use sqlx::SqlitePool;
use tracing::instrument;

fn homepage_photo(entry: PhotoWithOwner, user_id: i64, storage: &dyn ObjectStorage) -> HomepagePhoto {
    let photo = entry.photo;
    HomepagePhoto {
        id: photo.id,
        image: storage.url(&photo.image),
        created_at: photo.created_at,
        is_bookmarked: photo.is_bookmarked,
        format: photo.format,
        username: entry.username,
        is_shared: photo.user_id != user_id,
    }
}

async fn homepage_album(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    entry: AlbumWithOwner,
) -> Result<HomepageAlbum, HomepageError> {
    let album = entry.album;
    let mut photos = AlbumStore::list_photos_with_owner(pool, album.id).await?;

    let cover = match album.cover_photo_id {
        Some(cover_id) => PhotoStore::find_with_owner(pool, cover_id).await?,
        None => None,
    };
    let cover_image = cover.as_ref().map(|c| storage.url(&c.photo.image));
    let photo_count = AlbumStore::photo_count(pool, album.id).await?;
    if let Some(cover) = cover
        && !photos.iter().any(|p| p.photo.id == cover.photo.id)
    {
        photos.push(cover);
    }

    Ok(HomepageAlbum {
        id: album.id,
        name: album.name,
        created_at: album.created_at,
        photo_count,
        cover_image,
        username: entry.username,
        is_shared: album.user_id != user_id,
        photos: photos
            .into_iter()
            .map(|p| homepage_photo(p, user_id, storage))
            .collect(),
    })
}

/// The most recent photos and albums the user can see, owned or shared.
#[instrument(skip(pool, storage))]
pub async fn get_homepage(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
) -> Result<HomepageResponse, HomepageError> {
    let limits = &constants().homepage;
    let photos = PhotoStore::list_recent_accessible(pool, user_id, limits.photo_count).await?;
    let albums = AlbumStore::list_recent_accessible(pool, user_id, limits.album_count).await?;

    let mut album_entries = Vec::with_capacity(albums.len());
    for album in albums {
        album_entries.push(homepage_album(pool, storage, user_id, album).await?);
    }

    Ok(HomepageResponse {
        photos: photos
            .into_iter()
            .map(|p| homepage_photo(p, user_id, storage))
            .collect(),
        albums: album_entries,
    })
}
