use crate::routes::{albums, auth, homepage, photos, root, share};
use common_services::api::albums::interfaces::{
    AlbumDetailResponse, AlbumResponse, CreateAlbumRequest, PhotoIdsRequest, UpdateAlbumRequest,
};
use common_services::api::auth::interfaces::{CreateUser, LoginUser, Tokens, UserSummary};
use common_services::api::homepage::interfaces::{HomepageAlbum, HomepagePhoto, HomepageResponse};
use common_services::api::photos::interfaces::{
    PhotoDetailResponse, PhotoResponse, UpdatePhotoRequest,
};
use common_services::api::sharing::interfaces::{
    CollaborationResponse, CreateCollaborationRequest, UpdateCollaborationRequest,
};
use common_services::database::app_user::User;
use common_services::database::collaboration::{ContentType, Permission};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        // Auth handlers
        auth::handlers::login,
        auth::handlers::register,
        auth::handlers::get_me,
        auth::handlers::delete_me,
        // Photos handlers
        photos::handlers::list_photos_handler,
        photos::handlers::upload_photo_handler,
        photos::handlers::bulk_upload_handler,
        photos::handlers::bookmarked_photos_handler,
        photos::handlers::get_photo_handler,
        photos::handlers::update_photo_handler,
        photos::handlers::delete_photo_handler,
        // Album handlers
        albums::handlers::list_albums_handler,
        albums::handlers::create_album_handler,
        albums::handlers::get_album_details_handler,
        albums::handlers::update_album_handler,
        albums::handlers::delete_album_handler,
        albums::handlers::add_photos_handler,
        albums::handlers::remove_photos_handler,
        // Sharing handlers
        share::handlers::list_my_collaborations_handler,
        share::handlers::create_collaboration_handler,
        share::handlers::get_collaboration_handler,
        share::handlers::update_collaboration_handler,
        share::handlers::delete_collaboration_handler,
        share::handlers::list_received_collaborations_handler,
        share::handlers::shared_photos_handler,
        share::handlers::shared_albums_handler,
        // Homepage handlers
        homepage::handlers::homepage_handler,
    ),
    components(
        schemas(
            User,
            UserSummary,
            CreateUser,
            LoginUser,
            Tokens,
            PhotoResponse,
            PhotoDetailResponse,
            UpdatePhotoRequest,
            AlbumResponse,
            AlbumDetailResponse,
            CreateAlbumRequest,
            UpdateAlbumRequest,
            PhotoIdsRequest,
            ContentType,
            Permission,
            CollaborationResponse,
            CreateCollaborationRequest,
            UpdateCollaborationRequest,
            HomepagePhoto,
            HomepageAlbum,
            HomepageResponse,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Photos", description = "Uploading, browsing and managing photos"),
        (name = "Album", description = "Managing albums and their photos"),
        (name = "Sharing", description = "VIEW and EDIT grants on photos and albums"),
        (name = "Homepage", description = "Recent activity overview"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "User Management", description = "Account registration"),
        (name = "System", description = "Health check"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
