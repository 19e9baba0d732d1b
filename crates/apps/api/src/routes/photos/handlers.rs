use crate::api_state::ApiContext;
use crate::photos::form::read_upload;
use crate::routes::ApiJson;
use app_state::constants;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use common_services::api::pagination::{PageParams, Paginated};
use common_services::api::photos::error::PhotoError;
use common_services::api::photos::interfaces::{
    BulkUploadForm, PhotoDetailResponse, PhotoResponse, UpdatePhotoRequest, UploadPhotoForm,
};
use common_services::api::photos::service::{
    bulk_upload, delete_photo, get_photo, list_bookmarked, list_photos, update_photo,
    upload_photo,
};
use common_services::database::app_user::User;
use tracing::instrument;

/// List every photo the user owns or can see through a grant, newest first.
///
/// # Errors
///
/// Returns a `PhotoError` if the database query fails.
#[utoipa::path(
    get,
    path = "/api/photos",
    tag = "Photos",
    params(PageParams),
    responses(
        (status = 200, description = "A page of accessible photos.", body = Paginated<PhotoResponse>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn list_photos_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<PhotoResponse>>, PhotoError> {
    let page = params.resolve(&constants().pagination);
    let photos = list_photos(&context.pool, context.storage.as_ref(), user.id, page).await?;
    Ok(Json(photos))
}

/// Upload a single photo.
///
/// # Errors
///
/// Returns a `PhotoError` if the file is missing or not an image, or storing it fails.
#[utoipa::path(
    post,
    path = "/api/photos",
    tag = "Photos",
    request_body(content = UploadPhotoForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photo stored.", body = PhotoResponse),
        (status = 400, description = "Missing or invalid image."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, multipart), fields(user_id = user.id), err(Debug))]
pub async fn upload_photo_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PhotoResponse>), PhotoError> {
    let upload = read_upload(multipart).await?;
    let photo = upload_photo(&context.pool, context.storage.as_ref(), user.id, upload).await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

/// Upload several photos at once. Files that are not images are skipped.
///
/// # Errors
///
/// Returns a `PhotoError` if no image was submitted.
#[utoipa::path(
    post,
    path = "/api/photos/bulk",
    tag = "Photos",
    request_body(content = BulkUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photos stored.", body = Vec<PhotoResponse>),
        (status = 400, description = "No images submitted."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, multipart), fields(user_id = user.id), err(Debug))]
pub async fn bulk_upload_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<PhotoResponse>>), PhotoError> {
    let upload = read_upload(multipart).await?;
    let photos = bulk_upload(&context.pool, context.storage.as_ref(), user.id, upload).await?;
    Ok((StatusCode::CREATED, Json(photos)))
}

/// All bookmarked photos the user can see.
///
/// # Errors
///
/// Returns a `PhotoError` if the database query fails.
#[utoipa::path(
    get,
    path = "/api/photos/bookmarked",
    tag = "Photos",
    responses(
        (status = 200, description = "Bookmarked photos.", body = Vec<PhotoResponse>),
    ),
    security(("bearer_auth" = []))
)]
pub async fn bookmarked_photos_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<PhotoResponse>>, PhotoError> {
    let photos = list_bookmarked(&context.pool, context.storage.as_ref(), user.id).await?;
    Ok(Json(photos))
}

/// Get a photo together with its owner.
///
/// # Errors
///
/// Returns `PhotoError::NotFound` if the photo does not exist or is not visible.
#[utoipa::path(
    get,
    path = "/api/photos/{photo_id}",
    tag = "Photos",
    params(("photo_id" = i64, Path, description = "Photo id")),
    responses(
        (status = 200, description = "The photo.", body = PhotoDetailResponse),
        (status = 404, description = "Photo not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn get_photo_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(photo_id): Path<i64>,
) -> Result<Json<PhotoDetailResponse>, PhotoError> {
    let photo = get_photo(&context.pool, context.storage.as_ref(), user.id, photo_id).await?;
    Ok(Json(photo))
}

/// Update bookmark state or metadata of an owned photo. Serves both PUT and PATCH.
///
/// # Errors
///
/// Returns `PhotoError::Forbidden` for photos the user can see but does not own.
#[utoipa::path(
    patch,
    path = "/api/photos/{photo_id}",
    tag = "Photos",
    params(("photo_id" = i64, Path, description = "Photo id")),
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Updated photo.", body = PhotoResponse),
        (status = 403, description = "Only the owner may change a photo."),
        (status = 404, description = "Photo not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user, payload), fields(user_id = user.id), err(Debug))]
pub async fn update_photo_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(photo_id): Path<i64>,
    ApiJson(payload): ApiJson<UpdatePhotoRequest>,
) -> Result<Json<PhotoResponse>, PhotoError> {
    let photo = update_photo(
        &context.pool,
        context.storage.as_ref(),
        user.id,
        photo_id,
        payload,
    )
    .await?;
    Ok(Json(photo))
}

/// Delete an owned photo and its stored file.
///
/// # Errors
///
/// Returns `PhotoError::Forbidden` for photos the user can see but does not own.
#[utoipa::path(
    delete,
    path = "/api/photos/{photo_id}",
    tag = "Photos",
    params(("photo_id" = i64, Path, description = "Photo id")),
    responses(
        (status = 204, description = "Photo deleted."),
        (status = 403, description = "Only the owner may delete a photo."),
        (status = 404, description = "Photo not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn delete_photo_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(photo_id): Path<i64>,
) -> Result<StatusCode, PhotoError> {
    delete_photo(&context.pool, context.storage.as_ref(), user.id, photo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
