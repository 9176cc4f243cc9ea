use crate::common::{
    FixtureRoute, MockStore, MockVision, TestApp, db_untouched, db_with_insert, routes,
    scores_fixture, spawn_fixture_server,
};

fn jpeg_bytes() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]
}

mod fetch_from_url {
    use super::*;

    #[tokio::test]
    async fn extracts_and_resolves_image_urls() {
        let html = r#"
            <html><body>
                <img src="/a.jpg">
                <source srcset="https://x.example/b.png 2x, https://x.example/c.png 1x">
                <img src="/style.css">
            </body></html>
        "#;
        let site = spawn_fixture_server(vec![FixtureRoute {
            path: "/page",
            status: 200,
            content_type: "text/html",
            body: html.as_bytes().to_vec(),
        }])
        .await;

        let app = TestApp::spawn(
            db_untouched(),
            MockStore::new(),
            MockVision::returning(scores_fixture()),
        )
        .await;

        let res = app
            .post_json(
                routes::FETCH_FROM_URL,
                &serde_json::json!({ "url": format!("http://{site}/page") }),
            )
            .await;

        assert_eq!(res.status, 200, "fetch-from-url failed: {}", res.text);
        assert_eq!(res.body["count"], 2);
        let images: Vec<&str> = res.body["images"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(images.contains(&format!("http://{site}/a.jpg").as_str()));
        assert!(images.contains(&"https://x.example/b.png"));
        assert!(!images.iter().any(|u| u.contains("c.png")));
    }

    #[tokio::test]
    async fn remote_http_error_is_reported_with_status() {
        let site = spawn_fixture_server(vec![]).await;

        let app = TestApp::spawn(
            db_untouched(),
            MockStore::new(),
            MockVision::returning(scores_fixture()),
        )
        .await;

        let res = app
            .post_json(
                routes::FETCH_FROM_URL,
                &serde_json::json!({ "url": format!("http://{site}/nothing-here") }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "FETCH_FAILED");
        assert!(res.body["message"].as_str().unwrap().contains("404"));
    }

    #[tokio::test]
    async fn unreachable_host_is_reported_as_network_error() {
        let app = TestApp::spawn(
            db_untouched(),
            MockStore::new(),
            MockVision::returning(scores_fixture()),
        )
        .await;

        // Port 1 on loopback refuses connections.
        let res = app
            .post_json(
                routes::FETCH_FROM_URL,
                &serde_json::json!({ "url": "http://127.0.0.1:1/page" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "FETCH_FAILED");
    }

    #[tokio::test]
    async fn invalid_url_is_a_validation_error() {
        let app = TestApp::spawn(
            db_untouched(),
            MockStore::new(),
            MockVision::returning(scores_fixture()),
        )
        .await;

        let res = app
            .post_json(
                routes::FETCH_FROM_URL,
                &serde_json::json!({ "url": "not a url" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod analyze_url {
    use super::*;

    #[tokio::test]
    async fn downloads_and_analyzes_a_remote_image() {
        let site = spawn_fixture_server(vec![FixtureRoute {
            path: "/photos/cat.jpg",
            status: 200,
            content_type: "image/jpeg",
            body: jpeg_bytes(),
        }])
        .await;

        let app = TestApp::spawn(
            db_with_insert(),
            MockStore::new(),
            MockVision::returning(scores_fixture()),
        )
        .await;

        let res = app
            .post_json(
                routes::ANALYZE_URL,
                &serde_json::json!({ "url": format!("http://{site}/photos/cat.jpg") }),
            )
            .await;

        assert_eq!(res.status, 200, "analyze-url failed: {}", res.text);
        assert_eq!(res.body["filename"], "cat.jpg");
        assert_eq!(res.body["id"], "img-1");
        assert!(res.body["scores"]["faces"].is_null());
        assert_eq!(app.store.upload_count(), 1);
        assert_eq!(app.vision.call_count(), 1);
    }

    #[tokio::test]
    async fn rejects_non_image_content_type() {
        let site = spawn_fixture_server(vec![FixtureRoute {
            path: "/page",
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: b"<html></html>".to_vec(),
        }])
        .await;

        let app = TestApp::spawn(
            db_untouched(),
            MockStore::new(),
            MockVision::returning(scores_fixture()),
        )
        .await;

        let res = app
            .post_json(
                routes::ANALYZE_URL,
                &serde_json::json!({ "url": format!("http://{site}/page") }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(app.store.upload_count(), 0);
    }
}

mod analyze_urls {
    use super::*;

    #[tokio::test]
    async fn failing_url_does_not_stop_the_batch() {
        let site = spawn_fixture_server(vec![FixtureRoute {
            path: "/ok.jpg",
            status: 200,
            content_type: "image/jpeg",
            body: jpeg_bytes(),
        }])
        .await;

        let app = TestApp::spawn(
            db_with_insert(),
            MockStore::new(),
            MockVision::returning(scores_fixture()),
        )
        .await;

        let good = format!("http://{site}/ok.jpg");
        let bad = format!("http://{site}/gone.jpg");
        let res = app
            .post_json(routes::ANALYZE_URLS, &serde_json::json!([good, bad]))
            .await;

        assert_eq!(res.status, 200, "analyze-urls failed: {}", res.text);
        let results = res.body["results"].as_array().unwrap();
        let failed = res.body["failed"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(failed.len(), 1);
        assert_eq!(results[0]["filename"], "ok.jpg");
        assert_eq!(failed[0]["url"], bad);
        assert!(failed[0]["error"]
            .as_str()
            .unwrap()
            .contains("Failed to fetch URL"));
    }
}
