use crate::api_state::ApiContext;
use crate::photos::handlers::{
    bookmarked_photos_handler, bulk_upload_handler, delete_photo_handler, get_photo_handler,
    list_photos_handler, update_photo_handler, upload_photo_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

pub fn photos_protected_router() -> Router<ApiContext> {
    Router::new()
        .route(
            "/api/photos",
            get(list_photos_handler).post(upload_photo_handler),
        )
        .route("/api/photos/bulk", post(bulk_upload_handler))
        .route("/api/photos/bookmarked", get(bookmarked_photos_handler))
        .route(
            "/api/photos/{photo_id}",
            get(get_photo_handler)
                .put(update_photo_handler)
                .patch(update_photo_handler)
                .delete(delete_photo_handler),
        )
}
