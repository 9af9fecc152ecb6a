mod common;

use axum::http::{StatusCode, header};
use serde_json::{Value, json};

async fn shorten(app: &common::TestApp, url: &str) -> String {
    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": url }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["short_code"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_redirect_success() {
    let app = common::spawn_app();
    let code = shorten(&app, "https://example.com/target").await;

    let response = app.server.get(&format!("/{code}")).await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header(header::LOCATION),
        "https://example.com/target"
    );
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = common::spawn_app();

    let response = app.server.get("/nonexist").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
    assert!(app.links.all().is_empty());
}

#[tokio::test]
async fn test_redirect_counts_every_visit() {
    let app = common::spawn_app();
    let code = shorten(&app, "https://example.com").await;

    for _ in 0..5 {
        app.server
            .get(&format!("/{code}"))
            .await
            .assert_status(StatusCode::TEMPORARY_REDIRECT);
    }

    assert_eq!(app.wait_for_clicks(&code, 5).await, 5);
}

#[tokio::test]
async fn test_redirect_unknown_code_counts_nothing() {
    let app = common::spawn_app();
    let code = shorten(&app, "https://example.com").await;

    app.server
        .get("/unknown1")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(app.links.get(&code).unwrap().clicks, 0);
}
