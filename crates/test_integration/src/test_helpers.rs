use crate::runner::context::test_context::TestContext;
use crate::test_constants::{PASSWORD, PNG_BYTES};
use color_eyre::Result;
use color_eyre::eyre::bail;
use common_services::api::albums::interfaces::AlbumResponse;
use common_services::api::auth::interfaces::{Tokens, UserSummary};
use common_services::api::photos::interfaces::PhotoResponse;
use common_services::api::sharing::interfaces::CollaborationResponse;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

/// An account created for one test, with a valid access token.
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

pub async fn register(context: &TestContext, email: &str) -> Result<UserSummary> {
    let response = context
        .http_client
        .post(context.url("/api/users/register"))
        .json(&json!({ "email": email, "password": PASSWORD, "password2": PASSWORD }))
        .send()
        .await?;
    if response.status() != StatusCode::CREATED {
        bail!(
            "registering {email} failed with {}: {}",
            response.status(),
            response.text().await?
        );
    }
    Ok(response.json().await?)
}

pub async fn login(context: &TestContext, email: &str) -> Result<String> {
    let response = context
        .http_client
        .post(context.url("/api/token"))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await?;
    let tokens: Tokens = response.json().await?;

    Ok(tokens.access_token)
}

pub async fn create_user(context: &TestContext, email: &str) -> Result<TestUser> {
    let user = register(context, email).await?;
    let token = login(context, email).await?;
    Ok(TestUser {
        id: user.id,
        email: user.email,
        token,
    })
}

pub fn image_part(file_name: &str, bytes: &[u8]) -> Result<Part> {
    Ok(Part::bytes(bytes.to_vec())
        .file_name(file_name.to_owned())
        .mime_str("application/octet-stream")?)
}

pub async fn upload_photo(context: &TestContext, user: &TestUser) -> Result<PhotoResponse> {
    let form = Form::new().part("image", image_part("photo.png", PNG_BYTES)?);
    let response = context
        .http_client
        .post(context.url("/api/photos"))
        .bearer_auth(&user.token)
        .multipart(form)
        .send()
        .await?;
    if response.status() != StatusCode::CREATED {
        bail!("upload failed with {}", response.status());
    }
    Ok(response.json().await?)
}

pub async fn create_album(
    context: &TestContext,
    user: &TestUser,
    body: Value,
) -> Result<AlbumResponse> {
    let response = context
        .http_client
        .post(context.url("/api/albums"))
        .bearer_auth(&user.token)
        .json(&body)
        .send()
        .await?;
    if response.status() != StatusCode::CREATED {
        bail!(
            "creating album failed with {}: {}",
            response.status(),
            response.text().await?
        );
    }
    Ok(response.json().await?)
}

/// Posts a grant and returns the raw response, for tests that expect failures.
pub async fn post_share(
    context: &TestContext,
    user: &TestUser,
    body: &Value,
) -> Result<reqwest::Response> {
    Ok(context
        .http_client
        .post(context.url("/api/share"))
        .bearer_auth(&user.token)
        .json(body)
        .send()
        .await?)
}

pub async fn share_photo(
    context: &TestContext,
    granter: &TestUser,
    grantee: &TestUser,
    photo_id: i64,
    permission: &str,
) -> Result<CollaborationResponse> {
    let body = json!({
        "shared_with_email": grantee.email,
        "content_type": "PHOTO",
        "photo_id": photo_id,
        "permission": permission,
    });
    let response = post_share(context, granter, &body).await?;
    if response.status() != StatusCode::CREATED {
        bail!(
            "sharing photo failed with {}: {}",
            response.status(),
            response.text().await?
        );
    }
    Ok(response.json().await?)
}

pub async fn share_album(
    context: &TestContext,
    granter: &TestUser,
    grantee: &TestUser,
    album_id: i64,
    permission: &str,
) -> Result<CollaborationResponse> {
    let body = json!({
        "shared_with_email": grantee.email,
        "content_type": "ALBUM",
        "album_id": album_id,
        "permission": permission,
    });
    let response = post_share(context, granter, &body).await?;
    if response.status() != StatusCode::CREATED {
        bail!(
            "sharing album failed with {}: {}",
            response.status(),
            response.text().await?
        );
    }
    Ok(response.json().await?)
}

/// GET as the user and return only the status.
pub async fn get_status(context: &TestContext, user: &TestUser, path: &str) -> Result<StatusCode> {
    Ok(context
        .http_client
        .get(context.url(path))
        .bearer_auth(&user.token)
        .send()
        .await?
        .status())
}
