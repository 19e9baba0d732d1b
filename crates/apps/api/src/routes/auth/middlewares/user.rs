use crate::api_state::ApiContext;
use crate::auth::middlewares::common::{decode_token, extract_context, extract_token};
use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use common_services::api::auth::error::AuthError;
use common_services::database::app_user::User;
use common_services::database::user_store::UserStore;
use tracing::debug;

/// Resolves the bearer token of a request to its stored user.
pub async fn authenticate(context: &ApiContext, parts: &Parts) -> Result<User, AuthError> {
    let token = extract_token(parts)?;
    let claims = decode_token(&token, &context.settings.secrets.jwt)?;
    // tokens outlive deleted accounts
    UserStore::find_by_id(&context.pool, claims.sub)
        .await?
        .ok_or(AuthError::UserNotFound)
}

/// The authenticated user.
///
/// Runs as the route layer of every protected router, which leaves the `User` in the
/// request extensions. Handlers read it with `Extension<User>`; extracting `ApiUser`
/// again reuses that value instead of hitting the database a second time.
#[derive(Clone, Debug)]
pub struct ApiUser(pub User);

impl<S> FromRequestParts<S> for ApiUser
where
    S: Send + Sync,
    State<ApiContext>: FromRequestParts<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>() {
            return Ok(Self(user.clone()));
        }

        let context = extract_context(parts, state).await?;
        let user = authenticate(&context, parts).await?;
        debug!(user_id = user.id, "Authenticated request");
        parts.extensions.insert(user.clone());
        Ok(Self(user))
    }
}
