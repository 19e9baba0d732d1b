use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    InvalidCredentials,
    UserAlreadyExists,
    UserNotFound,
    /// Registration input that failed validation, the message is shown to the client.
    Validation(String),
    Internal(eyre::Report),
}

fn log_auth_failure(error: &AuthError) {
    match error {
        AuthError::MissingToken => warn!("Authentication failed: Missing Authorization token."),
        AuthError::InvalidToken => warn!("Authentication failed: Invalid token provided."),
        AuthError::InvalidCredentials => {
            info!("Authentication failed: Invalid credentials provided.");
        }
        AuthError::UserAlreadyExists => info!("Registration failed: User already exists."),
        AuthError::UserNotFound => warn!("Authentication failed: User from token not found."),
        AuthError::Validation(message) => info!("Registration rejected: {message}"),
        AuthError::Internal(e) => {
            tracing::error!("Internal server error during authentication: {:?}", e);
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        log_auth_failure(&self);

        let (status, error_message) = match self {
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_owned(),
            ),
            Self::MissingToken | Self::InvalidToken | Self::UserNotFound => (
                StatusCode::UNAUTHORIZED,
                "Authentication failed".to_owned(),
            ),
            Self::UserAlreadyExists => (
                StatusCode::BAD_REQUEST,
                "A user with this email already exists".to_owned(),
            ),
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_owned(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

// Lets `?` turn database, hashing and token errors into `AuthError::Internal`.
impl<E> From<E> for AuthError
where
    E: Into<eyre::Report>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
