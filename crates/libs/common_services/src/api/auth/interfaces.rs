use crate::database::app_user::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Registration form. The email doubles as the username.
#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateUser {
    pub email: String,
    #[schema(value_type = String, format = "password", example = "my-secret-password")]
    pub password: String,
    /// Must repeat `password`.
    #[schema(value_type = String, format = "password", example = "my-secret-password")]
    pub password2: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginUser {
    pub email: String,
    #[schema(value_type = String, format = "password", example = "my-secret-password")]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct Tokens {
    /// Unix timestamp at which the access token expires.
    pub expiry: u64,
    pub access_token: String,
}

/// Represents the claims contained within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct AuthClaims {
    pub sub: i64, // user id
    pub exp: i64,
}

/// Public view of a user, embedded in photo, album and collaboration responses.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
