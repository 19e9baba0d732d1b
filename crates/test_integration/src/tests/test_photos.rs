use crate::runner::context::test_context::TestContext;
use crate::test_constants::{JPEG_BYTES, PNG_BYTES};
use crate::test_helpers::{create_user, get_status, image_part, share_photo, upload_photo};
use color_eyre::Result;
use common_services::api::pagination::Paginated;
use common_services::api::photos::interfaces::{PhotoDetailResponse, PhotoResponse};
use common_services::database::photo_store::PhotoStore;
use reqwest::StatusCode;
use reqwest::multipart::Form;
use serde_json::json;

pub async fn test_photo_upload_and_retrieve(context: &TestContext) -> Result<()> {
    // ARRANGE
    let user = create_user(context, "uploader@example.com").await?;
    let form = Form::new()
        .part("image", image_part("Holiday.PNG", PNG_BYTES)?)
        .text("is_bookmarked", "true")
        .text("metadata", r#"{"camera": "x100"}"#);

    // ACT
    let response = context
        .http_client
        .post(context.url("/api/photos"))
        .bearer_auth(&user.token)
        .multipart(form)
        .send()
        .await?;
    let status = response.status();
    let photo: PhotoResponse = response.json().await?;

    // ASSERT
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(photo.format, "png");
    assert!(photo.is_bookmarked);
    assert_eq!(photo.metadata["camera"], "x100");
    let media_prefix = format!("{}/media/photos/", context.settings.api.base_url());
    assert!(photo.image.starts_with(&media_prefix), "{}", photo.image);
    assert!(photo.image.ends_with(".png"));

    // the stored file is served back byte for byte
    let served = context.http_client.get(&photo.image).send().await?;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await?.as_ref(), PNG_BYTES);

    let detail: PhotoDetailResponse = context
        .http_client
        .get(context.url(&format!("/api/photos/{}", photo.id)))
        .bearer_auth(&user.token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(detail.photo.id, photo.id);
    assert_eq!(detail.user.email, user.email);

    let page: Paginated<PhotoResponse> = context
        .http_client
        .get(context.url("/api/photos"))
        .bearer_auth(&user.token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page.count, 1);
    assert_eq!(page.next, None);
    assert_eq!(page.previous, None);
    assert_eq!(page.results[0].id, photo.id);

    let far_page = context
        .http_client
        .get(context.url("/api/photos"))
        .query(&[("offset", i64::MAX)])
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(far_page.status(), StatusCode::OK);
    let far_page: Paginated<PhotoResponse> = far_page.json().await?;
    assert_eq!(far_page.count, 1);
    assert!(far_page.results.is_empty());
    assert_eq!(far_page.next, None);

    let stored = PhotoStore::find_by_id(&context.pool, photo.id)
        .await?
        .expect("photo was not stored");
    assert_eq!(stored.user_id, user.id);

    Ok(())
}

pub async fn test_upload_rejects_non_images(context: &TestContext) -> Result<()> {
    let user = create_user(context, "careless-uploader@example.com").await?;
    let url = context.url("/api/photos");

    let text_file = context
        .http_client
        .post(&url)
        .bearer_auth(&user.token)
        .multipart(Form::new().part("image", image_part("notes.txt", b"hello")?))
        .send()
        .await?;
    let no_file = context
        .http_client
        .post(&url)
        .bearer_auth(&user.token)
        .multipart(Form::new().text("is_bookmarked", "false"))
        .send()
        .await?;
    let bad_metadata = context
        .http_client
        .post(&url)
        .bearer_auth(&user.token)
        .multipart(
            Form::new()
                .part("image", image_part("photo.png", PNG_BYTES)?)
                .text("metadata", "{not json"),
        )
        .send()
        .await?;

    assert_eq!(text_file.status(), StatusCode::BAD_REQUEST);
    assert_eq!(no_file.status(), StatusCode::BAD_REQUEST);
    assert_eq!(bad_metadata.status(), StatusCode::BAD_REQUEST);
    assert_eq!(PhotoStore::count_accessible(&context.pool, user.id).await?, 0);

    Ok(())
}

pub async fn test_bulk_upload(context: &TestContext) -> Result<()> {
    // ARRANGE
    let user = create_user(context, "bulk@example.com").await?;
    let form = Form::new()
        .part("images[]", image_part("one.png", PNG_BYTES)?)
        .part("images[]", image_part("readme.md", b"# not a photo")?)
        .part("images[]", image_part("two.jpg", JPEG_BYTES)?)
        .text("is_bookmarked", "1");

    // ACT
    let response = context
        .http_client
        .post(context.url("/api/photos/bulk"))
        .bearer_auth(&user.token)
        .multipart(form)
        .send()
        .await?;
    let status = response.status();
    let photos: Vec<PhotoResponse> = response.json().await?;

    // ASSERT
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(photos.len(), 2);
    assert!(photos.iter().all(|p| p.is_bookmarked));
    let mut formats: Vec<&str> = photos.iter().map(|p| p.format.as_str()).collect();
    formats.sort_unstable();
    assert_eq!(formats, ["jpg", "png"]);

    let empty = context
        .http_client
        .post(context.url("/api/photos/bulk"))
        .bearer_auth(&user.token)
        .multipart(Form::new().text("is_bookmarked", "1"))
        .send()
        .await?;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let bookmarked: Vec<PhotoResponse> = context
        .http_client
        .get(context.url("/api/photos/bookmarked"))
        .bearer_auth(&user.token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(bookmarked.len(), 2);

    Ok(())
}

pub async fn test_photo_owner_only_changes(context: &TestContext) -> Result<()> {
    // ARRANGE
    let owner = create_user(context, "photo-owner@example.com").await?;
    let viewer = create_user(context, "photo-viewer@example.com").await?;
    let stranger = create_user(context, "photo-stranger@example.com").await?;
    let photo = upload_photo(context, &owner).await?;
    share_photo(context, &owner, &viewer, photo.id, "EDIT").await?;
    let path = format!("/api/photos/{}", photo.id);

    // ACT + ASSERT: visibility
    assert_eq!(get_status(context, &viewer, &path).await?, StatusCode::OK);
    assert_eq!(
        get_status(context, &stranger, &path).await?,
        StatusCode::NOT_FOUND
    );

    // only the owner may change or delete, even with an EDIT grant
    let viewer_patch = context
        .http_client
        .patch(context.url(&path))
        .bearer_auth(&viewer.token)
        .json(&json!({ "is_bookmarked": true }))
        .send()
        .await?;
    assert_eq!(viewer_patch.status(), StatusCode::FORBIDDEN);
    let stranger_delete = context
        .http_client
        .delete(context.url(&path))
        .bearer_auth(&stranger.token)
        .send()
        .await?;
    assert_eq!(stranger_delete.status(), StatusCode::NOT_FOUND);

    let owner_put = context
        .http_client
        .put(context.url(&path))
        .bearer_auth(&owner.token)
        .json(&json!({ "is_bookmarked": true, "metadata": { "rating": 5 } }))
        .send()
        .await?;
    assert_eq!(owner_put.status(), StatusCode::OK);
    let updated: PhotoResponse = owner_put.json().await?;
    assert!(updated.is_bookmarked);
    assert_eq!(updated.metadata["rating"], 5);
    assert_eq!(updated.image, photo.image);

    // shared bookmarked photos show up for the viewer as well
    let bookmarked: Vec<PhotoResponse> = context
        .http_client
        .get(context.url("/api/photos/bookmarked"))
        .bearer_auth(&viewer.token)
        .send()
        .await?
        .json()
        .await?;
    assert!(bookmarked.iter().any(|p| p.id == photo.id));

    let owner_delete = context
        .http_client
        .delete(context.url(&path))
        .bearer_auth(&owner.token)
        .send()
        .await?;
    assert_eq!(owner_delete.status(), StatusCode::NO_CONTENT);
    assert!(PhotoStore::find_by_id(&context.pool, photo.id).await?.is_none());
    assert_eq!(
        get_status(context, &owner, &path).await?,
        StatusCode::NOT_FOUND
    );
    let served = context.http_client.get(&photo.image).send().await?;
    assert_eq!(served.status(), StatusCode::NOT_FOUND);

    Ok(())
}
