//! This module defines the HTTP handlers for authentication-related routes.

use crate::api_state::ApiContext;
use crate::routes::ApiJson;
use axum::{Extension, Json, extract::State, http::StatusCode};
use common_services::api::auth::error::AuthError;
use common_services::api::auth::interfaces::{CreateUser, LoginUser, Tokens, UserSummary};
use common_services::api::auth::service::{
    authenticate_user, create_access_token, create_user, delete_account,
};
use common_services::database::app_user::User;
use tracing::instrument;

/// Handles user login and returns an access token.
///
/// # Errors
///
/// Returns `AuthError` if the user credentials are invalid or the token cannot be created.
#[utoipa::path(
    post,
    path = "/api/token",
    tag = "Auth",
    request_body = LoginUser,
    responses(
        (status = 200, description = "Login successful", body = Tokens),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[instrument(skip(context, payload), err(Debug))]
pub async fn login(
    State(context): State<ApiContext>,
    ApiJson(payload): ApiJson<LoginUser>,
) -> Result<Json<Tokens>, AuthError> {
    let user = authenticate_user(&context.pool, &payload.email, &payload.password).await?;
    let (access_token, expiry) = create_access_token(&context.settings.secrets.jwt, user.id)?;

    Ok(Json(Tokens {
        expiry,
        access_token,
    }))
}

/// Registers a new user. The email becomes the username.
///
/// # Errors
///
/// Returns `AuthError` if the form is invalid or the email is already registered.
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "User Management",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created successfully", body = UserSummary),
        (status = 400, description = "Invalid input or email already registered"),
    )
)]
#[instrument(skip(context, payload), err(Debug))]
pub async fn register(
    State(context): State<ApiContext>,
    ApiJson(payload): ApiJson<CreateUser>,
) -> Result<(StatusCode, Json<UserSummary>), AuthError> {
    let user = create_user(&context.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(UserSummary::from(&user))))
}

/// Gets the current authenticated user's information.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user data", body = User),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

/// Deletes the current account, with all photos, albums and grants it owns.
///
/// # Errors
///
/// Returns `AuthError` if the account cannot be removed.
#[utoipa::path(
    delete,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn delete_me(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
) -> Result<StatusCode, AuthError> {
    delete_account(&context.pool, context.storage.as_ref(), user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
