use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("internal error")]
    Internal(#[from] eyre::Report),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),
}

fn log_error(error: &ShareError) {
    match error {
        ShareError::Database(e) => warn!("Database query failed: {}", e),
        ShareError::Internal(e) => warn!("Internal error: {:?}", e),
        ShareError::NotFound(message) => warn!("Sharing -> Not found: {}", message),
        ShareError::Forbidden(message) => warn!("Sharing -> Forbidden: {}", message),
        ShareError::BadRequest(message) => warn!("Sharing -> Bad Request: {}", message),
    }
}

impl IntoResponse for ShareError {
    fn into_response(self) -> Response {
        log_error(&self);

        let (status, error_message) = match self {
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred.".to_owned(),
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal error occurred.".to_owned(),
            ),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<DbError> for ShareError {
    fn from(err: DbError) -> Self {
        match err {
            // a concurrent or repeated grant for the same (grantee, item)
            DbError::UniqueViolation(_) => {
                Self::BadRequest("This item is already shared with this user.".to_owned())
            }
            DbError::Sqlx(sql_err) => Self::Database(sql_err),
            DbError::SerdeJson(err) => Self::Internal(eyre::Report::new(err)),
        }
    }
}
