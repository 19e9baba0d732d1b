use crate::runner::context::test_context::TestContext;
use crate::test_constants::{EMAIL, PASSWORD};
use crate::test_helpers::{create_user, share_photo, upload_photo};
use app_state::constants;
use chrono::{DateTime, Utc};
use color_eyre::Result;
use common_services::api::auth::interfaces::{Tokens, UserSummary};
use common_services::database::app_user::User;
use common_services::database::collaboration_store::CollaborationStore;
use common_services::database::photo_store::PhotoStore;
use common_services::database::user_store::UserStore;
use reqwest::StatusCode;
use serde_json::{Value, json};

pub async fn test_register(context: &TestContext) -> Result<()> {
    // ACT
    let response = context
        .http_client
        .post(context.url("/api/users/register"))
        .json(&json!({ "email": EMAIL, "password": PASSWORD, "password2": PASSWORD }))
        .send()
        .await?;
    let status = response.status();
    let user: UserSummary = response.json().await?;

    // ASSERT
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user.email, EMAIL);
    assert_eq!(user.username, EMAIL);

    let stored = UserStore::find_by_email(&context.pool, EMAIL)
        .await?
        .expect("user was not stored");
    assert_eq!(stored.id, user.id);

    Ok(())
}

pub async fn test_second_register_attempt(context: &TestContext) -> Result<()> {
    // ACT
    let response = context
        .http_client
        .post(context.url("/api/users/register"))
        .json(&json!({
            "email": EMAIL.to_uppercase(),
            "password": PASSWORD,
            "password2": PASSWORD,
        }))
        .send()
        .await?;
    let status = response.status();
    let body: Value = response.json().await?;

    // ASSERT
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    Ok(())
}

pub async fn test_register_validation(context: &TestContext) -> Result<()> {
    let url = context.url("/api/users/register");
    let cases = [
        json!({ "email": "mismatch@example.com", "password": PASSWORD, "password2": "other-password" }),
        json!({ "email": "numeric@example.com", "password": "1234567890", "password2": "1234567890" }),
        json!({ "email": "short@example.com", "password": "abc", "password2": "abc" }),
        json!({ "email": "not-an-email", "password": PASSWORD, "password2": PASSWORD }),
    ];

    for body in cases {
        let response = context.http_client.post(&url).json(&body).send().await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "accepted {body}");
    }
    assert!(
        UserStore::find_by_email(&context.pool, "mismatch@example.com")
            .await?
            .is_none()
    );

    Ok(())
}

pub async fn test_login(context: &TestContext) -> Result<()> {
    // ACT
    let response = context
        .http_client
        .post(context.url("/api/token"))
        .json(&json!({ "email": EMAIL, "password": PASSWORD }))
        .send()
        .await?;
    let login_status = response.status();
    let tokens: Tokens = response.json().await?;

    let response = context
        .http_client
        .get(context.url("/api/auth/me"))
        .bearer_auth(&tokens.access_token)
        .send()
        .await?;
    let me_status = response.status();
    let user: User = response.json().await?;

    // ASSERT
    assert_eq!(login_status, StatusCode::OK);
    let expiry_date =
        DateTime::from_timestamp(tokens.expiry as i64, 0).expect("invalid expiry date");
    let expire_seconds = (expiry_date - Utc::now()).num_seconds() as f64;
    let actual_expire_seconds = (constants().auth.access_token_expiry_minutes * 60) as f64;
    assert!((expire_seconds - actual_expire_seconds).abs() < 5.);

    assert_eq!(me_status, StatusCode::OK);
    assert_eq!(user.email, EMAIL);

    Ok(())
}

pub async fn test_invalid_login(context: &TestContext) -> Result<()> {
    let url = context.url("/api/token");

    let wrong_password = context
        .http_client
        .post(&url)
        .json(&json!({ "email": EMAIL, "password": "not-the-password" }))
        .send()
        .await?;
    let unknown_user = context
        .http_client
        .post(&url)
        .json(&json!({ "email": "nobody@example.com", "password": PASSWORD }))
        .send()
        .await?;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

pub async fn test_protected_routes_need_token(context: &TestContext) -> Result<()> {
    let url = context.url("/api/photos");

    let without_token = context.http_client.get(&url).send().await?;
    let bad_token = context
        .http_client
        .get(&url)
        .bearer_auth("not-a-jwt")
        .send()
        .await?;

    assert_eq!(without_token.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(bad_token.status(), StatusCode::UNAUTHORIZED);
    let body: Value = bad_token.json().await?;
    assert!(body["error"].is_string());

    Ok(())
}

pub async fn test_delete_account(context: &TestContext) -> Result<()> {
    // ARRANGE
    let leaving = create_user(context, "leaving@example.com").await?;
    let friend = create_user(context, "friend-of-leaving@example.com").await?;
    let photo = upload_photo(context, &leaving).await?;
    let grant = share_photo(context, &leaving, &friend, photo.id, "VIEW").await?;
    let key = photo
        .image
        .strip_prefix(&format!("{}/media/", context.settings.api.base_url()))
        .expect("image url points at the media route")
        .to_owned();
    let stored_file = context.settings.storage.media_folder.join(&key);
    assert!(stored_file.exists());

    // ACT
    let response = context
        .http_client
        .delete(context.url("/api/auth/me"))
        .bearer_auth(&leaving.token)
        .send()
        .await?;

    // ASSERT
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(UserStore::find_by_id(&context.pool, leaving.id).await?.is_none());
    assert!(PhotoStore::find_by_id(&context.pool, photo.id).await?.is_none());
    assert!(
        CollaborationStore::find_by_id(&context.pool, grant.id)
            .await?
            .is_none()
    );
    assert!(!stored_file.exists());

    // the token now names a user that no longer exists
    let me = context
        .http_client
        .get(context.url("/api/auth/me"))
        .bearer_auth(&leaving.token)
        .send()
        .await?;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
