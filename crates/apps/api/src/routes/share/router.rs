use crate::api_state::ApiContext;
use crate::share::handlers::{
    create_collaboration_handler, delete_collaboration_handler, get_collaboration_handler,
    list_my_collaborations_handler, list_received_collaborations_handler, shared_albums_handler,
    shared_photos_handler, update_collaboration_handler,
};
use axum::{Router, routing::get};

pub fn share_protected_router() -> Router<ApiContext> {
    Router::new()
        .route(
            "/api/share",
            get(list_my_collaborations_handler).post(create_collaboration_handler),
        )
        .route(
            "/api/share/received",
            get(list_received_collaborations_handler),
        )
        .route("/api/share/received/photos", get(shared_photos_handler))
        .route("/api/share/received/albums", get(shared_albums_handler))
        .route(
            "/api/share/{collaboration_id}",
            get(get_collaboration_handler)
                .put(update_collaboration_handler)
                .patch(update_collaboration_handler)
                .delete(delete_collaboration_handler),
        )
}
