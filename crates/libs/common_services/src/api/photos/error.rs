use crate::database::DbError;
use crate::storage::StorageError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("internal error")]
    Internal(#[from] eyre::Report),

    #[error("Photo not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),
}

fn log_error(error: &PhotoError) {
    match error {
        PhotoError::Database(e) => warn!("Database query failed: {}", e),
        PhotoError::Internal(e) => warn!("Internal error: {:?}", e),
        PhotoError::NotFound(id) => warn!("Photo not found: {}", id),
        PhotoError::Forbidden(message) => warn!("Photo -> Forbidden: {}", message),
        PhotoError::BadRequest(message) => warn!("Photo -> Bad Request: {}", message),
    }
}

impl IntoResponse for PhotoError {
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
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "Photo not found.".to_owned()),
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<DbError> for PhotoError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(sql_err) | DbError::UniqueViolation(sql_err) => Self::Database(sql_err),
            DbError::SerdeJson(err) => Self::Internal(eyre::Report::new(err)),
        }
    }
}

impl From<StorageError> for PhotoError {
    fn from(err: StorageError) -> Self {
        Self::Internal(eyre::Report::new(err))
    }
}
