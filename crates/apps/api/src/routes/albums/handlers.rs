use crate::api_state::ApiContext;
use crate::routes::ApiJson;
use app_state::constants;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use common_services::api::albums::error::AlbumError;
use common_services::api::albums::interfaces::{
    AlbumDetailResponse, AlbumResponse, CreateAlbumRequest, PhotoIdsRequest, UpdateAlbumRequest,
};
use common_services::api::albums::service::{
    add_photos_to_album, create_album, delete_album, get_album_details, list_albums,
    remove_photos_from_album, update_album,
};
use common_services::api::pagination::{PageParams, Paginated};
use common_services::database::app_user::User;
use tracing::instrument;

/// List the albums the user owns or has been granted, newest first.
///
/// # Errors
///
/// Returns an `AlbumError` if the database query fails.
#[utoipa::path(
    get,
    path = "/api/albums",
    tag = "Album",
    params(PageParams),
    responses(
        (status = 200, description = "A page of accessible albums.", body = Paginated<AlbumResponse>),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn list_albums_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<AlbumResponse>>, AlbumError> {
    let page = params.resolve(&constants().pagination);
    let albums = list_albums(&context.pool, context.storage.as_ref(), user.id, page).await?;
    Ok(Json(albums))
}

/// Create a new album.
///
/// # Errors
///
/// Returns `AlbumError::BadRequest` for an invalid name or a cover photo the user cannot see.
#[utoipa::path(
    post,
    path = "/api/albums",
    tag = "Album",
    request_body = CreateAlbumRequest,
    responses(
        (status = 201, description = "Album created.", body = AlbumResponse),
        (status = 400, description = "Invalid album data."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, payload), fields(user_id = user.id), err(Debug))]
pub async fn create_album_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    ApiJson(payload): ApiJson<CreateAlbumRequest>,
) -> Result<(StatusCode, Json<AlbumResponse>), AlbumError> {
    let album = create_album(&context.pool, context.storage.as_ref(), user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(album)))
}

/// Get an album with its photos and owner.
///
/// # Errors
///
/// Returns `AlbumError::NotFound` if the album does not exist or is not visible.
#[utoipa::path(
    get,
    path = "/api/albums/{album_id}",
    tag = "Album",
    params(("album_id" = i64, Path, description = "The id of the album.")),
    responses(
        (status = 200, description = "Album details.", body = AlbumDetailResponse),
        (status = 404, description = "Album not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn get_album_details_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(album_id): Path<i64>,
) -> Result<Json<AlbumDetailResponse>, AlbumError> {
    let album =
        get_album_details(&context.pool, context.storage.as_ref(), user.id, album_id).await?;
    Ok(Json(album))
}

/// Update an owned album's name, description or cover. Serves both PUT and PATCH.
///
/// # Errors
///
/// Returns `AlbumError::Forbidden` if the user can see the album but does not own it.
#[utoipa::path(
    patch,
    path = "/api/albums/{album_id}",
    tag = "Album",
    params(("album_id" = i64, Path, description = "The id of the album to update.")),
    request_body = UpdateAlbumRequest,
    responses(
        (status = 200, description = "Album updated.", body = AlbumResponse),
        (status = 400, description = "Invalid album data."),
        (status = 403, description = "Only the owner may change an album."),
        (status = 404, description = "Album not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, payload), fields(user_id = user.id), err(Debug))]
pub async fn update_album_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(album_id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateAlbumRequest>,
) -> Result<Json<AlbumResponse>, AlbumError> {
    let album = update_album(
        &context.pool,
        context.storage.as_ref(),
        user.id,
        album_id,
        payload,
    )
    .await?;
    Ok(Json(album))
}

/// Delete an owned album. Its photos are kept.
///
/// # Errors
///
/// Returns `AlbumError::Forbidden` if the user can see the album but does not own it.
#[utoipa::path(
    delete,
    path = "/api/albums/{album_id}",
    tag = "Album",
    params(("album_id" = i64, Path, description = "The id of the album.")),
    responses(
        (status = 204, description = "Album deleted."),
        (status = 403, description = "Only the owner may delete an album."),
        (status = 404, description = "Album not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn delete_album_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(album_id): Path<i64>,
) -> Result<StatusCode, AlbumError> {
    delete_album(&context.pool, user.id, album_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add photos to an album. Requires EDIT on the album. Photos the user cannot see are skipped.
///
/// # Errors
///
/// Returns `AlbumError::Forbidden` without EDIT access.
#[utoipa::path(
    post,
    path = "/api/albums/{album_id}/add_photos",
    tag = "Album",
    params(("album_id" = i64, Path, description = "The id of the album.")),
    request_body = PhotoIdsRequest,
    responses(
        (status = 200, description = "Album after the change.", body = AlbumDetailResponse),
        (status = 403, description = "EDIT access is required."),
        (status = 404, description = "Album not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, payload), fields(user_id = user.id), err(Debug))]
pub async fn add_photos_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(album_id): Path<i64>,
    ApiJson(payload): ApiJson<PhotoIdsRequest>,
) -> Result<Json<AlbumDetailResponse>, AlbumError> {
    let album = add_photos_to_album(
        &context.pool,
        context.storage.as_ref(),
        user.id,
        album_id,
        &payload.photo_ids,
    )
    .await?;
    Ok(Json(album))
}

/// Remove photos from an album. Requires EDIT on the album.
///
/// # Errors
///
/// Returns `AlbumError::Forbidden` without EDIT access.
#[utoipa::path(
    post,
    path = "/api/albums/{album_id}/remove_photos",
    tag = "Album",
    params(("album_id" = i64, Path, description = "The id of the album.")),
    request_body = PhotoIdsRequest,
    responses(
        (status = 200, description = "Album after the change.", body = AlbumDetailResponse),
        (status = 403, description = "EDIT access is required."),
        (status = 404, description = "Album not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, payload), fields(user_id = user.id), err(Debug))]
pub async fn remove_photos_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(album_id): Path<i64>,
    ApiJson(payload): ApiJson<PhotoIdsRequest>,
) -> Result<Json<AlbumDetailResponse>, AlbumError> {
    let album = remove_photos_from_album(
        &context.pool,
        context.storage.as_ref(),
        user.id,
        album_id,
        &payload.photo_ids,
    )
    .await?;
    Ok(Json(album))
}
