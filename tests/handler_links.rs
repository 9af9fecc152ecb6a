mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

async fn shorten(
    app: &common::TestApp,
    url: &str,
    token: Option<&str>,
    anonymous_id: Option<&str>,
) -> String {
    let mut request = app.server.post("/api/shorten");
    if let Some(token) = token {
        request = request.authorization_bearer(token);
    }
    let response = request
        .json(&json!({ "url": url, "anonymous_id": anonymous_id }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["short_code"]
        .as_str()
        .unwrap()
        .to_string()
}

fn codes(body: &Value) -> Vec<String> {
    body["urls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|url| url["short_code"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_links_for_user_newest_first() {
    let app = common::spawn_app();
    let token = app.access_token("alice", "alice@x.com").await;

    let first = shorten(&app, "https://a.example", Some(&token), None).await;
    let second = shorten(&app, "https://b.example", Some(&token), None).await;
    shorten(&app, "https://c.example", None, Some("anon-1")).await;

    let response = app
        .server
        .get("/api/urls")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["total"], 2);
    assert_eq!(codes(&json), vec![second, first]);
}

#[tokio::test]
async fn test_list_links_by_anonymous_id() {
    let app = common::spawn_app();

    let mine = shorten(&app, "https://a.example", None, Some("anon-1")).await;
    shorten(&app, "https://b.example", None, Some("anon-2")).await;

    let response = app
        .server
        .get("/api/urls")
        .add_query_param("anonymous_id", "anon-1")
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["total"], 1);
    assert_eq!(codes(&json), vec![mine]);
    assert_eq!(json["urls"][0]["anonymous_id"], "anon-1");
    assert_eq!(json["urls"][0]["user_id"], Value::Null);
}

#[tokio::test]
async fn test_list_links_user_takes_precedence_over_anonymous_id() {
    let app = common::spawn_app();
    let token = app.access_token("alice", "alice@x.com").await;

    shorten(&app, "https://a.example", None, Some("anon-1")).await;

    let response = app
        .server
        .get("/api/urls")
        .authorization_bearer(&token)
        .add_query_param("anonymous_id", "anon-1")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["total"], 0);
}

#[tokio::test]
async fn test_list_links_without_identity_returns_all() {
    let app = common::spawn_app();
    let token = app.access_token("alice", "alice@x.com").await;

    shorten(&app, "https://a.example", Some(&token), None).await;
    shorten(&app, "https://b.example", None, Some("anon-1")).await;
    shorten(&app, "https://c.example", None, None).await;

    let response = app.server.get("/api/urls").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["total"], 3);
}

#[tokio::test]
async fn test_link_details() {
    let app = common::spawn_app();
    let code = shorten(&app, "https://a.example/x", None, Some("anon-1")).await;

    let response = app.server.get(&format!("/api/urls/{code}")).await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["short_code"], code.as_str());
    assert_eq!(json["original_url"], "https://a.example/x");
    assert_eq!(
        json["short_url"].as_str().unwrap(),
        format!("{}/{}", common::TEST_BASE_URL, code)
    );
    assert_eq!(json["clicks"], 0);
    assert!(json["created_at"].is_string());
}

#[tokio::test]
async fn test_link_details_does_not_count_clicks() {
    let app = common::spawn_app();
    let code = shorten(&app, "https://a.example", None, None).await;

    for _ in 0..3 {
        app.server
            .get(&format!("/api/urls/{code}"))
            .await
            .assert_status_ok();
    }

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(app.links.get(&code).unwrap().clicks, 0);
}

#[tokio::test]
async fn test_link_details_not_found() {
    let app = common::spawn_app();

    let response = app.server.get("/api/urls/missing1").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["message"], "Short URL not found");
}
