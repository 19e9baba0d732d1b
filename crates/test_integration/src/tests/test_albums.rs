use crate::runner::context::test_context::TestContext;
use crate::test_helpers::{
    create_album, create_user, get_status, share_album, share_photo, upload_photo,
};
use color_eyre::Result;
use common_services::api::albums::interfaces::{AlbumDetailResponse, AlbumResponse};
use common_services::api::pagination::Paginated;
use common_services::database::album_store::AlbumStore;
use reqwest::StatusCode;
use serde_json::{Value, json};

pub async fn test_album_lifecycle(context: &TestContext) -> Result<()> {
    // ARRANGE
    let owner = create_user(context, "album-owner@example.com").await?;
    let stranger = create_user(context, "album-stranger@example.com").await?;

    // ACT: create
    let album = create_album(
        context,
        &owner,
        json!({ "name": "Summer", "description": "Beach days" }),
    )
    .await?;
    let path = format!("/api/albums/{}", album.id);

    // ASSERT
    assert_eq!(album.name, "Summer");
    assert_eq!(album.description, "Beach days");
    assert_eq!(album.photo_count, 0);
    assert!(album.cover_photo.is_none());

    for body in [json!({ "name": "" }), json!({ "name": "x".repeat(256) })] {
        let response = context
            .http_client
            .post(context.url("/api/albums"))
            .bearer_auth(&owner.token)
            .json(&body)
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    let malformed = context
        .http_client
        .post(context.url("/api/albums"))
        .bearer_auth(&owner.token)
        .header("content-type", "application/json")
        .body("{\"name\":")
        .send()
        .await?;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    let body: Value = malformed.json().await?;
    assert!(body["error"].is_string());

    // update
    let response = context
        .http_client
        .patch(context.url(&path))
        .bearer_auth(&owner.token)
        .json(&json!({ "name": "Summer 2025" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: AlbumResponse = response.json().await?;
    assert_eq!(updated.name, "Summer 2025");
    assert_eq!(updated.description, "Beach days");

    // list
    let page: Paginated<AlbumResponse> = context
        .http_client
        .get(context.url("/api/albums"))
        .bearer_auth(&owner.token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].id, album.id);

    // strangers cannot tell the album exists
    assert_eq!(
        get_status(context, &stranger, &path).await?,
        StatusCode::NOT_FOUND
    );
    let stranger_delete = context
        .http_client
        .delete(context.url(&path))
        .bearer_auth(&stranger.token)
        .send()
        .await?;
    assert_eq!(stranger_delete.status(), StatusCode::NOT_FOUND);

    // delete
    let response = context
        .http_client
        .delete(context.url(&path))
        .bearer_auth(&owner.token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(AlbumStore::find_by_id(&context.pool, album.id).await?.is_none());
    assert_eq!(
        get_status(context, &owner, &path).await?,
        StatusCode::NOT_FOUND
    );

    Ok(())
}

pub async fn test_album_cover_and_photo_count(context: &TestContext) -> Result<()> {
    // ARRANGE
    let owner = create_user(context, "cover-owner@example.com").await?;
    let other = create_user(context, "cover-other@example.com").await?;
    let cover = upload_photo(context, &owner).await?;
    let member = upload_photo(context, &owner).await?;
    let foreign = upload_photo(context, &other).await?;

    // ACT + ASSERT: an unattached cover counts as one photo
    let album = create_album(
        context,
        &owner,
        json!({ "name": "Covers", "cover_photo_id": cover.id }),
    )
    .await?;
    assert_eq!(album.photo_count, 1);
    assert_eq!(album.cover_photo.as_ref().map(|p| p.id), Some(cover.id));

    // a cover the user cannot see is rejected
    let response = context
        .http_client
        .post(context.url("/api/albums"))
        .bearer_auth(&owner.token)
        .json(&json!({ "name": "Sneaky", "cover_photo_id": foreign.id }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let add_url = context.url(&format!("/api/albums/{}/add_photos", album.id));
    let detail: AlbumDetailResponse = context
        .http_client
        .post(&add_url)
        .bearer_auth(&owner.token)
        .json(&json!({ "photo_ids": [member.id] }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(detail.album.photo_count, 2);
    // album detail lists attached photos only
    assert_eq!(detail.photos.len(), 1);

    let detail: AlbumDetailResponse = context
        .http_client
        .post(&add_url)
        .bearer_auth(&owner.token)
        .json(&json!({ "photo_ids": [cover.id, member.id] }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(detail.album.photo_count, 2);
    assert_eq!(detail.photos.len(), 2);

    // explicit null clears the cover, a missing field keeps it
    let path = context.url(&format!("/api/albums/{}", album.id));
    let kept: AlbumResponse = context
        .http_client
        .patch(&path)
        .bearer_auth(&owner.token)
        .json(&json!({ "description": "still covered" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(kept.cover_photo.map(|p| p.id), Some(cover.id));
    let cleared: AlbumResponse = context
        .http_client
        .patch(&path)
        .bearer_auth(&owner.token)
        .json(&json!({ "cover_photo_id": null }))
        .send()
        .await?
        .json()
        .await?;
    assert!(cleared.cover_photo.is_none());
    assert_eq!(cleared.photo_count, 2);
    assert_eq!(AlbumStore::photo_count(&context.pool, album.id).await?, 2);

    Ok(())
}

pub async fn test_album_photo_management(context: &TestContext) -> Result<()> {
    // ARRANGE
    let owner = create_user(context, "managed-owner@example.com").await?;
    let editor = create_user(context, "managed-editor@example.com").await?;
    let viewer = create_user(context, "managed-viewer@example.com").await?;
    let stranger = create_user(context, "managed-stranger@example.com").await?;
    let own_photo = upload_photo(context, &owner).await?;
    let editor_photo = upload_photo(context, &editor).await?;
    let hidden_photo = upload_photo(context, &stranger).await?;
    let album = create_album(context, &owner, json!({ "name": "Shared trip" })).await?;
    share_album(context, &owner, &editor, album.id, "EDIT").await?;
    share_album(context, &owner, &viewer, album.id, "VIEW").await?;
    let add_url = context.url(&format!("/api/albums/{}/add_photos", album.id));
    let remove_url = context.url(&format!("/api/albums/{}/remove_photos", album.id));

    // ACT + ASSERT: photos the acting user cannot see are skipped
    let response = context
        .http_client
        .post(&add_url)
        .bearer_auth(&owner.token)
        .json(&json!({ "photo_ids": [own_photo.id, hidden_photo.id, 999_999] }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let detail: AlbumDetailResponse = response.json().await?;
    let ids: Vec<i64> = detail.photos.iter().map(|p| p.id).collect();
    assert_eq!(ids, [own_photo.id]);
    assert_eq!(detail.user.email, owner.email);

    // an EDIT grantee may add their own photos
    let response = context
        .http_client
        .post(&add_url)
        .bearer_auth(&editor.token)
        .json(&json!({ "photo_ids": [editor_photo.id] }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let detail: AlbumDetailResponse = response.json().await?;
    assert_eq!(detail.photos.len(), 2);

    // VIEW grantees see the album with its photos
    let detail: AlbumDetailResponse = context
        .http_client
        .get(context.url(&format!("/api/albums/{}", album.id)))
        .bearer_auth(&viewer.token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(detail.photos.len(), 2);

    // a VIEW grantee may look but not change
    let response = context
        .http_client
        .post(&add_url)
        .bearer_auth(&viewer.token)
        .json(&json!({ "photo_ids": [own_photo.id] }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = context
        .http_client
        .post(&remove_url)
        .bearer_auth(&stranger.token)
        .json(&json!({ "photo_ids": [own_photo.id] }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // grantees cannot delete the album itself
    let response = context
        .http_client
        .delete(context.url(&format!("/api/albums/{}", album.id)))
        .bearer_auth(&editor.token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = context
        .http_client
        .post(&remove_url)
        .bearer_auth(&editor.token)
        .json(&json!({ "photo_ids": [own_photo.id] }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let detail: AlbumDetailResponse = response.json().await?;
    let ids: Vec<i64> = detail.photos.iter().map(|p| p.id).collect();
    assert_eq!(ids, [editor_photo.id]);

    // sharing a single photo does not expose the albums it belongs to
    let loose = upload_photo(context, &owner).await?;
    share_photo(context, &owner, &stranger, loose.id, "VIEW").await?;
    assert_eq!(
        get_status(context, &stranger, &format!("/api/albums/{}", album.id)).await?,
        StatusCode::NOT_FOUND
    );

    Ok(())
}
