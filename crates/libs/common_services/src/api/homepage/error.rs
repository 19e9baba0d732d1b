use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum HomepageError {
    #[error("database error: {0}")]
    Database(#[from] DbError),
}

impl IntoResponse for HomepageError {
    fn into_response(self) -> Response {
        match &self {
            Self::Database(e) => warn!("Homepage -> Database query failed: {}", e),
        }
        let body = Json(json!({ "error": "A database error occurred." }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
