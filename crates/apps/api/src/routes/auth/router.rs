use crate::api_state::ApiContext;
use crate::auth::handlers::{delete_me, get_me, login, register};
use axum::{
    Router,
    routing::{get, post},
};

pub fn auth_public_router() -> Router<ApiContext> {
    Router::new()
        .route("/api/users/register", post(register))
        .route("/api/token", post(login))
}

pub fn auth_protected_router() -> Router<ApiContext> {
    Router::new().route("/api/auth/me", get(get_me).delete(delete_me))
}
