//! Handlers for granting, inspecting and revoking access to photos and albums.

use crate::api_state::ApiContext;
use crate::routes::ApiJson;
use app_state::constants;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use common_services::api::albums::interfaces::AlbumResponse;
use common_services::api::pagination::{PageParams, Paginated};
use common_services::api::photos::interfaces::PhotoResponse;
use common_services::api::sharing::error::ShareError;
use common_services::api::sharing::interfaces::{
    CollaborationResponse, ContentTypeFilter, CreateCollaborationRequest,
    UpdateCollaborationRequest,
};
use common_services::api::sharing::service::{
    create_collaboration, delete_collaboration, get_collaboration, list_albums_shared_with_me,
    list_my_collaborations, list_photos_shared_with_me, list_received_collaborations,
    update_collaboration,
};
use common_services::database::app_user::User;
use tracing::instrument;

/// List the grants the user has handed out.
///
/// # Errors
///
/// Returns a `ShareError` if the database query fails.
#[utoipa::path(
    get,
    path = "/api/share",
    tag = "Sharing",
    params(PageParams, ContentTypeFilter),
    responses(
        (status = 200, description = "Grants made by the user.", body = Paginated<CollaborationResponse>),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn list_my_collaborations_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Query(params): Query<PageParams>,
    Query(filter): Query<ContentTypeFilter>,
) -> Result<Json<Paginated<CollaborationResponse>>, ShareError> {
    let page = params.resolve(&constants().pagination);
    let grants = list_my_collaborations(
        &context.pool,
        context.storage.as_ref(),
        user.id,
        filter.scope(),
        page,
    )
    .await?;
    Ok(Json(grants))
}

/// Share a photo or album with another user.
///
/// # Errors
///
/// Returns `ShareError::BadRequest` for invalid or duplicate grants and
/// `ShareError::Forbidden` when the user cannot hand out the requested permission.
#[utoipa::path(
    post,
    path = "/api/share",
    tag = "Sharing",
    request_body = CreateCollaborationRequest,
    responses(
        (status = 201, description = "Grant created.", body = CollaborationResponse),
        (status = 400, description = "Invalid or duplicate grant."),
        (status = 403, description = "The user lacks the access needed to share."),
        (status = 404, description = "Item or recipient not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, payload), fields(user_id = user.id), err(Debug))]
pub async fn create_collaboration_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    ApiJson(payload): ApiJson<CreateCollaborationRequest>,
) -> Result<(StatusCode, Json<CollaborationResponse>), ShareError> {
    let grant = create_collaboration(&context.pool, context.storage.as_ref(), &user, payload).await?;
    Ok((StatusCode::CREATED, Json(grant)))
}

/// Get one grant. Only its granter and grantee can see it.
///
/// # Errors
///
/// Returns `ShareError::NotFound` for grants the user is not part of.
#[utoipa::path(
    get,
    path = "/api/share/{collaboration_id}",
    tag = "Sharing",
    params(("collaboration_id" = i64, Path, description = "The id of the grant.")),
    responses(
        (status = 200, description = "The grant.", body = CollaborationResponse),
        (status = 404, description = "Grant not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn get_collaboration_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(collaboration_id): Path<i64>,
) -> Result<Json<CollaborationResponse>, ShareError> {
    let grant = get_collaboration(
        &context.pool,
        context.storage.as_ref(),
        user.id,
        collaboration_id,
    )
    .await?;
    Ok(Json(grant))
}

/// Change a grant's permission or message. Serves both PUT and PATCH.
///
/// # Errors
///
/// Returns `ShareError::Forbidden` for changes the user may not make.
#[utoipa::path(
    patch,
    path = "/api/share/{collaboration_id}",
    tag = "Sharing",
    params(("collaboration_id" = i64, Path, description = "The id of the grant.")),
    request_body = UpdateCollaborationRequest,
    responses(
        (status = 200, description = "Updated grant.", body = CollaborationResponse),
        (status = 403, description = "The change is not allowed."),
        (status = 404, description = "Grant not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, payload), fields(user_id = user.id), err(Debug))]
pub async fn update_collaboration_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(collaboration_id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateCollaborationRequest>,
) -> Result<Json<CollaborationResponse>, ShareError> {
    let grant = update_collaboration(
        &context.pool,
        context.storage.as_ref(),
        user.id,
        collaboration_id,
        payload,
    )
    .await?;
    Ok(Json(grant))
}

/// Revoke a grant, or leave one that names the user.
///
/// # Errors
///
/// Returns `ShareError::NotFound` for grants the user is not part of.
#[utoipa::path(
    delete,
    path = "/api/share/{collaboration_id}",
    tag = "Sharing",
    params(("collaboration_id" = i64, Path, description = "The id of the grant.")),
    responses(
        (status = 204, description = "Grant removed."),
        (status = 404, description = "Grant not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn delete_collaboration_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(collaboration_id): Path<i64>,
) -> Result<StatusCode, ShareError> {
    delete_collaboration(&context.pool, user.id, collaboration_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the grants that name the user.
///
/// # Errors
///
/// Returns a `ShareError` if the database query fails.
#[utoipa::path(
    get,
    path = "/api/share/received",
    tag = "Sharing",
    params(PageParams, ContentTypeFilter),
    responses(
        (status = 200, description = "Grants received by the user.", body = Paginated<CollaborationResponse>),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn list_received_collaborations_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Query(params): Query<PageParams>,
    Query(filter): Query<ContentTypeFilter>,
) -> Result<Json<Paginated<CollaborationResponse>>, ShareError> {
    let page = params.resolve(&constants().pagination);
    let grants = list_received_collaborations(
        &context.pool,
        context.storage.as_ref(),
        user.id,
        filter.scope(),
        page,
    )
    .await?;
    Ok(Json(grants))
}

/// Photos other users shared with the user, most recently shared first.
///
/// # Errors
///
/// Returns a `ShareError` if the database query fails.
#[utoipa::path(
    get,
    path = "/api/share/received/photos",
    tag = "Sharing",
    params(PageParams),
    responses(
        (status = 200, description = "Photos shared with the user.", body = Paginated<PhotoResponse>),
    ),
    security(("bearer_auth" = []))
)]
pub async fn shared_photos_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<PhotoResponse>>, ShareError> {
    let page = params.resolve(&constants().pagination);
    let photos =
        list_photos_shared_with_me(&context.pool, context.storage.as_ref(), user.id, page).await?;
    Ok(Json(photos))
}

/// Albums other users shared with the user, most recently shared first.
///
/// # Errors
///
/// Returns a `ShareError` if the database query fails.
#[utoipa::path(
    get,
    path = "/api/share/received/albums",
    tag = "Sharing",
    params(PageParams),
    responses(
        (status = 200, description = "Albums shared with the user.", body = Paginated<AlbumResponse>),
    ),
    security(("bearer_auth" = []))
)]
pub async fn shared_albums_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<AlbumResponse>>, ShareError> {
    let page = params.resolve(&constants().pagination);
    let albums =
        list_albums_shared_with_me(&context.pool, context.storage.as_ref(), user.id, page).await?;
    Ok(Json(albums))
}
