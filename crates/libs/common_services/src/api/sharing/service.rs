use crate::api::access::{Access, access_level, find_target};
use crate::api::albums::interfaces::AlbumResponse;
use crate::api::albums::service::album_response;
use crate::api::auth::interfaces::UserSummary;
use crate::api::pagination::{Page, Paginated};
use crate::api::photos::interfaces::PhotoResponse;
use crate::api::sharing::error::ShareError;
use crate::api::sharing::interfaces::{
    CollaborationResponse, ContentTypeScope, CreateCollaborationRequest,
    UpdateCollaborationRequest,
};
use crate::database::album_store::AlbumStore;
use crate::database::app_user::User;
use crate::database::collaboration::{Collaboration, ContentType, Permission, SharedItem};
use crate::database::collaboration_store::CollaborationStore;
use crate::database::photo_store::PhotoStore;
use crate::database::user_store::UserStore;
use crate::storage::ObjectStorage;
use color_eyre::eyre::eyre;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{info, instrument};

fn item_not_found(item: SharedItem) -> ShareError {
    match item {
        SharedItem::Photo(id) => ShareError::NotFound(format!("Photo {id} not found.")),
        SharedItem::Album(id) => ShareError::NotFound(format!("Album {id} not found.")),
    }
}

/// Maps grants to their responses, loading users, photos and albums in bulk.
async fn collaboration_responses(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    collaborations: Vec<Collaboration>,
) -> Result<Vec<CollaborationResponse>, ShareError> {
    let user_ids: Vec<i64> = collaborations
        .iter()
        .flat_map(|c| [c.shared_by_id, c.shared_with_id])
        .collect();
    let photo_ids: Vec<i64> = collaborations.iter().filter_map(|c| c.photo_id).collect();
    let album_ids: Vec<i64> = collaborations.iter().filter_map(|c| c.album_id).collect();

    let users: HashMap<i64, UserSummary> = UserStore::list_by_ids(pool, &user_ids)
        .await?
        .iter()
        .map(|user| (user.id, UserSummary::from(user)))
        .collect();
    let photos: HashMap<i64, PhotoResponse> = PhotoStore::list_by_ids(pool, &photo_ids)
        .await?
        .into_iter()
        .map(|photo| (photo.id, PhotoResponse::from_photo(photo, storage)))
        .collect();
    let mut albums: HashMap<i64, AlbumResponse> = HashMap::new();
    for album in AlbumStore::list_by_ids(pool, &album_ids).await? {
        albums.insert(album.id, album_response(pool, storage, album).await?);
    }

    let user = |id: i64| {
        users
            .get(&id)
            .cloned()
            .ok_or_else(|| ShareError::Internal(eyre!("user {id} of a collaboration is missing")))
    };

    collaborations
        .into_iter()
        .map(|c| -> Result<CollaborationResponse, ShareError> {
            Ok(CollaborationResponse {
                id: c.id,
                shared_by: user(c.shared_by_id)?,
                shared_with: user(c.shared_with_id)?,
                message: c.message,
                content_type: c.content_type,
                photo: c.photo_id.and_then(|id| photos.get(&id).cloned()),
                album: c.album_id.and_then(|id| albums.get(&id).cloned()),
                permission: c.permission,
                created_at: c.created_at,
            })
        })
        .collect()
}

async fn collaboration_response(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    collaboration: Collaboration,
) -> Result<CollaborationResponse, ShareError> {
    collaboration_responses(pool, storage, vec![collaboration])
        .await?
        .pop()
        .ok_or_else(|| ShareError::Internal(eyre!("collaboration response went missing")))
}

/// Loads a grant that the user created or received. Anyone else gets not found.
async fn load_visible_collaboration(
    pool: &SqlitePool,
    user_id: i64,
    collaboration_id: i64,
) -> Result<Collaboration, ShareError> {
    CollaborationStore::find_by_id(pool, collaboration_id)
        .await?
        .filter(|c| c.shared_by_id == user_id || c.shared_with_id == user_id)
        .ok_or_else(|| ShareError::NotFound("Collaboration not found.".to_owned()))
}

/// Shares a photo or album with another user.
///
/// Checks run in a fixed order so the first failing rule decides the error:
/// missing item id, sharing with yourself, unknown grantee, missing item,
/// granter without edit access, grantee owning the item. The insert itself
/// rejects a second grant for the same grantee and item.
#[instrument(skip(pool, storage, granter), fields(granter = granter.id))]
pub async fn create_collaboration(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    granter: &User,
    payload: CreateCollaborationRequest,
) -> Result<CollaborationResponse, ShareError> {
    let item = SharedItem::from_parts(payload.content_type, payload.photo_id, payload.album_id)
        .ok_or_else(|| {
            let field = match payload.content_type {
                ContentType::Photo => "photo_id",
                ContentType::Album => "album_id",
            };
            ShareError::BadRequest(format!(
                "{field} is required when content_type is {}.",
                payload.content_type
            ))
        })?;

    let email = payload.shared_with_email.trim();
    if email.eq_ignore_ascii_case(granter.email.trim()) {
        return Err(ShareError::BadRequest(
            "You cannot share with yourself.".to_owned(),
        ));
    }

    let grantee = UserStore::find_by_email(pool, email)
        .await?
        .ok_or_else(|| ShareError::NotFound("User with this email does not exist.".to_owned()))?;

    let target = find_target(pool, item)
        .await?
        .ok_or_else(|| item_not_found(item))?;

    if access_level(pool, granter.id, target).await? != Access::Edit {
        return Err(ShareError::Forbidden(format!(
            "You do not have permission to share this {}.",
            item.content_type().as_str().to_lowercase()
        )));
    }

    if target.owner_id == grantee.id {
        return Err(ShareError::BadRequest(
            "This user already owns this item.".to_owned(),
        ));
    }

    let collaboration = CollaborationStore::create(
        pool,
        granter.id,
        grantee.id,
        item,
        payload.permission,
        &payload.message,
    )
    .await?;
    info!(
        "User {} shared {:?} with user {} ({})",
        granter.id, item, grantee.id, payload.permission
    );
    collaboration_response(pool, storage, collaboration).await
}

#[instrument(skip(pool, storage))]
pub async fn get_collaboration(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    collaboration_id: i64,
) -> Result<CollaborationResponse, ShareError> {
    let collaboration = load_visible_collaboration(pool, user_id, collaboration_id).await?;
    collaboration_response(pool, storage, collaboration).await
}

/// Changes a grant.
///
/// The granter may change permission and message, raising to edit only while they still
/// hold edit access on the item. The grantee may only lower edit to view.
#[instrument(skip(pool, storage))]
pub async fn update_collaboration(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    collaboration_id: i64,
    payload: UpdateCollaborationRequest,
) -> Result<CollaborationResponse, ShareError> {
    let collaboration = load_visible_collaboration(pool, user_id, collaboration_id).await?;

    if collaboration.shared_by_id == user_id {
        let raises_to_edit = payload.permission == Some(Permission::Edit)
            && collaboration.permission != Permission::Edit;
        if raises_to_edit {
            let item = collaboration
                .item()
                .ok_or_else(|| eyre!("collaboration {collaboration_id} has no item"))?;
            let granter_access = match find_target(pool, item).await? {
                Some(target) => access_level(pool, user_id, target).await?,
                None => Access::NoAccess,
            };
            if granter_access != Access::Edit {
                return Err(ShareError::Forbidden(
                    "You no longer have edit access to this item.".to_owned(),
                ));
            }
        }
    } else {
        let only_lowers = payload.message.is_none()
            && payload.permission == Some(Permission::View);
        if !only_lowers {
            return Err(ShareError::Forbidden(
                "Only the user who shared this item can change it.".to_owned(),
            ));
        }
    }

    let updated = CollaborationStore::update(
        pool,
        collaboration.id,
        payload.permission,
        payload.message.as_deref(),
    )
    .await?;
    collaboration_response(pool, storage, updated).await
}

/// Removes a grant. The granter revokes it, or the grantee leaves.
#[instrument(skip(pool))]
pub async fn delete_collaboration(
    pool: &SqlitePool,
    user_id: i64,
    collaboration_id: i64,
) -> Result<(), ShareError> {
    let collaboration = load_visible_collaboration(pool, user_id, collaboration_id).await?;
    CollaborationStore::delete(pool, collaboration.id).await?;
    if collaboration.shared_by_id == user_id {
        info!("User {user_id} revoked collaboration {collaboration_id}");
    } else {
        info!("User {user_id} left collaboration {collaboration_id}");
    }
    Ok(())
}

/// Grants the user created.
#[instrument(skip(pool, storage))]
pub async fn list_my_collaborations(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    scope: ContentTypeScope,
    page: Page,
) -> Result<Paginated<CollaborationResponse>, ShareError> {
    let content_type = match scope {
        ContentTypeScope::All => None,
        ContentTypeScope::Only(content_type) => Some(content_type),
        ContentTypeScope::Nothing => return Ok(Paginated::new(vec![], 0, page)),
    };
    let collaborations = CollaborationStore::list_shared_by(
        pool,
        user_id,
        content_type,
        page.limit,
        page.offset,
    )
    .await?;
    let count = CollaborationStore::count_shared_by(pool, user_id, content_type).await?;
    let results = collaboration_responses(pool, storage, collaborations).await?;
    Ok(Paginated::new(results, count, page))
}

/// Grants naming the user as grantee.
#[instrument(skip(pool, storage))]
pub async fn list_received_collaborations(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    scope: ContentTypeScope,
    page: Page,
) -> Result<Paginated<CollaborationResponse>, ShareError> {
    let content_type = match scope {
        ContentTypeScope::All => None,
        ContentTypeScope::Only(content_type) => Some(content_type),
        ContentTypeScope::Nothing => return Ok(Paginated::new(vec![], 0, page)),
    };
    let collaborations = CollaborationStore::list_shared_with(
        pool,
        user_id,
        content_type,
        page.limit,
        page.offset,
    )
    .await?;
    let count = CollaborationStore::count_shared_with(pool, user_id, content_type).await?;
    let results = collaboration_responses(pool, storage, collaborations).await?;
    Ok(Paginated::new(results, count, page))
}

#[instrument(skip(pool, storage))]
pub async fn list_photos_shared_with_me(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    page: Page,
) -> Result<Paginated<PhotoResponse>, ShareError> {
    let photos = PhotoStore::list_shared_with(pool, user_id, page.limit, page.offset).await?;
    let count = PhotoStore::count_shared_with(pool, user_id).await?;
    let results = photos
        .into_iter()
        .map(|photo| PhotoResponse::from_photo(photo, storage))
        .collect();
    Ok(Paginated::new(results, count, page))
}

#[instrument(skip(pool, storage))]
pub async fn list_albums_shared_with_me(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
    page: Page,
) -> Result<Paginated<AlbumResponse>, ShareError> {
    let albums = AlbumStore::list_shared_with(pool, user_id, page.limit, page.offset).await?;
    let count = AlbumStore::count_shared_with(pool, user_id).await?;
    let mut results = Vec::with_capacity(albums.len());
    for album in albums {
        results.push(album_response(pool, storage, album).await?);
    }
    Ok(Paginated::new(results, count, page))
}
