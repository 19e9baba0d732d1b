use axum::Json;
use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::warn;

/// JSON body extractor that reports unreadable bodies as `400 {"error": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(JsonBodyError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug)]
pub struct JsonBodyError(JsonRejection);

impl From<JsonRejection> for JsonBodyError {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection)
    }
}

impl IntoResponse for JsonBodyError {
    fn into_response(self) -> Response {
        let message = self.0.body_text();
        warn!("Rejected request body: {}", message);
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
    }
}
