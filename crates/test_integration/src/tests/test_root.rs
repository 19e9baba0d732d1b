use crate::runner::context::test_context::TestContext;
use serde_json::Value;

pub async fn test_root_endpoint(context: &TestContext) -> color_eyre::Result<()> {
    // ACT
    let response = context.http_client.get(context.url("/")).send().await?;

    // ASSERT
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response.text().await?.contains("/api/docs"));

    Ok(())
}

pub async fn test_health_endpoint(context: &TestContext) -> color_eyre::Result<()> {
    // ACT
    let response = context
        .http_client
        .get(context.url("/api/health"))
        .send()
        .await?;
    let status = response.status();
    let timing = response.headers().get("x-execution-time").cloned();
    let body: Value = response.json().await?;

    // ASSERT
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["api"], "healthy");
    assert_eq!(body["database"], "healthy");
    assert!(timing.is_some());

    Ok(())
}
