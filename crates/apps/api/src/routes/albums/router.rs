use crate::api_state::ApiContext;
use crate::albums::handlers::{
    add_photos_handler, create_album_handler, delete_album_handler, get_album_details_handler,
    list_albums_handler, remove_photos_handler, update_album_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

pub fn albums_protected_router() -> Router<ApiContext> {
    Router::new()
        .route(
            "/api/albums",
            get(list_albums_handler).post(create_album_handler),
        )
        .route(
            "/api/albums/{album_id}",
            get(get_album_details_handler)
                .put(update_album_handler)
                .patch(update_album_handler)
                .delete(delete_album_handler),
        )
        .route("/api/albums/{album_id}/add_photos", post(add_photos_handler))
        .route(
            "/api/albums/{album_id}/remove_photos",
            post(remove_photos_handler),
        )
}
