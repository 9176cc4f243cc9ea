use crate::common::{MockStore, MockVision, TestApp, db_untouched, scores_fixture, test_config};

#[tokio::test]
async fn health_reports_complete_configuration() {
    let app = TestApp::spawn(
        db_untouched(),
        MockStore::new(),
        MockVision::returning(scores_fixture()),
    )
    .await;

    let res = app.get("/health").await;

    assert_eq!(res.status, 200, "health failed: {}", res.text);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["checks"]["vision_api_key"], true);
    assert_eq!(res.body["checks"]["storage_credentials"], true);
    assert_eq!(res.body["checks"]["database_url"], true);
}

#[tokio::test]
async fn health_flags_missing_credentials() {
    let mut config = test_config();
    config.vision.api_key = String::new();
    config.storage.secret_key = String::new();

    let app = TestApp::spawn_with_config(
        db_untouched(),
        MockStore::new(),
        MockVision::returning(scores_fixture()),
        config,
    )
    .await;

    let res = app.get("/health").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["checks"]["vision_api_key"], false);
    assert_eq!(res.body["checks"]["storage_credentials"], false);
    assert_eq!(res.body["checks"]["database_url"], true);
}

#[tokio::test]
async fn landing_page_is_served_at_root() {
    let app = TestApp::spawn(
        db_untouched(),
        MockStore::new(),
        MockVision::returning(scores_fixture()),
    )
    .await;

    let res = app
        .client
        .get(format!("http://{}/", app.addr))
        .send()
        .await
        .expect("Failed to fetch landing page");

    assert_eq!(res.status().as_u16(), 200);
    let content_type = res
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "{content_type}");
    let body = res.text().await.unwrap();
    assert!(body.contains("Lenscore"));
}
