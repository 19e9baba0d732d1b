use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum AlbumError {
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

fn log_error(error: &AlbumError) {
    match error {
        AlbumError::Database(e) => warn!("Database query failed: {}", e),
        AlbumError::Internal(e) => warn!("Internal error: {:?}", e),
        AlbumError::NotFound(id) => {
            warn!("Album not found: {}", id);
        }
        AlbumError::Forbidden(message) => {
            warn!("Album -> Forbidden: {}", message);
        }
        AlbumError::BadRequest(message) => {
            warn!("Album -> Bad Request: {}", message);
        }
    }
}

impl IntoResponse for AlbumError {
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
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "Album not found.".to_owned()),
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<DbError> for AlbumError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(sql_err) | DbError::UniqueViolation(sql_err) => Self::Database(sql_err),
            DbError::SerdeJson(err) => Self::Internal(eyre::Report::new(err)),
        }
    }
}
