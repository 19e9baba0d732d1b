use crate::api::auth::error::AuthError;
use crate::api::auth::hashing::{hash_password, verify_password};
use crate::api::auth::interfaces::{AuthClaims, CreateUser};
use crate::database::DbError;
use crate::database::app_user::{User, UserWithPassword};
use crate::database::photo_store::PhotoStore;
use crate::database::user_store::UserStore;
use crate::storage::ObjectStorage;
use app_state::constants;
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

/// Checks the shape of an email address: one `@`, a non-empty local part and a dotted domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Validates a registration form before anything touches the database.
///
/// # Errors
///
/// * `AuthError::Validation` naming the first rule that failed.
pub fn validate_registration(payload: &CreateUser, min_password_length: usize) -> Result<(), AuthError> {
    let email = payload.email.trim();
    if !is_valid_email(email) {
        return Err(AuthError::Validation("Enter a valid email address.".to_owned()));
    }
    if payload.password != payload.password2 {
        return Err(AuthError::Validation("Password fields didn't match.".to_owned()));
    }
    let password = &payload.password;
    if password.chars().count() < min_password_length {
        return Err(AuthError::Validation(format!(
            "This password is too short. It must contain at least {min_password_length} characters."
        )));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(AuthError::Validation("This password is entirely numeric.".to_owned()));
    }
    let local_part = email.split('@').next().unwrap_or_default();
    if password.eq_ignore_ascii_case(email) || password.eq_ignore_ascii_case(local_part) {
        return Err(AuthError::Validation(
            "The password is too similar to the email.".to_owned(),
        ));
    }
    Ok(())
}

/// Authenticates a user based on email and password.
///
/// # Errors
///
/// * `AuthError::InvalidCredentials` if the email or password is incorrect.
#[instrument(skip(pool, password))]
pub async fn authenticate_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<UserWithPassword, AuthError> {
    let user = UserStore::find_by_email_with_password(pool, email.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let valid = verify_password(password.as_ref(), &user.password)?;
    if !valid {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(user)
}

/// Registers a new user. The username is the email address.
///
/// # Errors
///
/// * `AuthError::Validation` if the form does not pass [`validate_registration`].
/// * `AuthError::UserAlreadyExists` if the email is taken.
#[instrument(skip(pool, payload), fields(email = %payload.email))]
pub async fn create_user(pool: &SqlitePool, payload: &CreateUser) -> Result<User, AuthError> {
    validate_registration(payload, constants().auth.min_password_length)?;
    let email = payload.email.trim();
    if UserStore::find_by_email(pool, email).await?.is_some() {
        return Err(AuthError::UserAlreadyExists);
    }

    let hashed = hash_password(payload.password.as_ref())?;
    info!("Creating user email={}", email);
    match UserStore::create(pool, email, email, &hashed).await {
        Ok(user) => Ok(user),
        // lost a race against a registration for the same email
        Err(DbError::UniqueViolation(_)) => Err(AuthError::UserAlreadyExists),
        Err(e) => Err(e.into()),
    }
}

/// Creates a new access token for a given user ID.
///
/// # Errors
///
/// * `jsonwebtoken::Error` if token encoding fails.
pub fn create_access_token(jwt_secret: &str, user_id: i64) -> Result<(String, u64), AuthError> {
    let exp =
        (Utc::now() + Duration::minutes(constants().auth.access_token_expiry_minutes)).timestamp();
    let claims = AuthClaims { sub: user_id, exp };
    let access_token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )?;

    Ok((access_token, exp as u64))
}

/// Deletes an account with everything it owns, then removes the stored photo files.
///
/// File removal failures are logged and do not fail the request, the rows are already gone.
#[instrument(skip(pool, storage))]
pub async fn delete_account(
    pool: &SqlitePool,
    storage: &dyn ObjectStorage,
    user_id: i64,
) -> Result<(), AuthError> {
    let images = PhotoStore::list_images_by_user(pool, user_id).await?;
    let deleted = UserStore::delete(pool, user_id).await?;
    if deleted == 0 {
        return Err(AuthError::UserNotFound);
    }

    for image in &images {
        if let Err(e) = storage.delete(image).await {
            warn!("Could not remove {image} for deleted user {user_id}: {e}");
        }
    }
    info!("Deleted user {user_id} and {} photos.", images.len());
    Ok(())
}
