use crate::api_state::ApiContext;
use crate::homepage::handlers::homepage_handler;
use axum::{Router, routing::get};

pub fn homepage_protected_router() -> Router<ApiContext> {
    Router::new().route("/api/homepage", get(homepage_handler))
}
