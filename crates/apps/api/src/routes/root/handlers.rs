use crate::api_state::ApiContext;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::error;

#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    responses(
        (status = 200, description = "Root message")
    )
)]
pub async fn root() -> &'static str {
    "Photo sharing API. Documentation lives at /api/docs."
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "System",
    responses(
        (status = 200, description = "API and database are healthy", body = serde_json::Value),
        (status = 503, description = "The database cannot be reached", body = serde_json::Value)
    )
)]
pub async fn health_check(State(context): State<ApiContext>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").fetch_one(&context.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "api": "healthy", "database": "healthy" })),
        ),
        Err(e) => {
            error!("Health check failed: database connection error: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "api": "healthy",
                    "database": "unhealthy",
                    "database_error": e.to_string(),
                })),
            )
        }
    }
}
