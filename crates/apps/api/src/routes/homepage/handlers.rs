use crate::api_state::ApiContext;
use axum::extract::State;
use axum::{Extension, Json};
use common_services::api::homepage::error::HomepageError;
use common_services::api::homepage::interfaces::HomepageResponse;
use common_services::api::homepage::service::get_homepage;
use common_services::database::app_user::User;
use tracing::instrument;

/// Most recent photos and albums the user can see.
///
/// # Errors
///
/// Returns a `HomepageError` if the database query fails.
#[utoipa::path(
    get,
    path = "/api/homepage",
    tag = "Homepage",
    responses(
        (status = 200, description = "Recent photos and albums.", body = HomepageResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, user), fields(user_id = user.id), err(Debug))]
pub async fn homepage_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
) -> Result<Json<HomepageResponse>, HomepageError> {
    let homepage = get_homepage(&context.pool, context.storage.as_ref(), user.id).await?;
    Ok(Json(homepage))
}
