//! E2E tests: user check and create API.

use actix_web::http::header;
use actix_web::test;
use serde_json::json;

use super::test_helpers::*;

const USERS_ENTRIES: &str = "/v3/content_types/users/entries";

/// (1) Missing or blank email is rejected before any upstream call.
#[actix_rt::test]
async fn test_check_user_requires_email() {
    let (mock, app) = setup().await;

    for body in [json!({}), json!({"email": "   "})] {
        let (status, body) = post_json(&app, "/api/user/check", body).await;
        assert_eq!(status, 400);
        assert_eq!(body["message"], "Email is required");
    }
    assert!(mock.requests().is_empty());
}

/// (2) Email lookup is case-insensitive and reports the stored username.
#[actix_rt::test]
async fn test_check_user_matches_case_insensitively() {
    let (mock, app) = setup().await;
    mock.seed(
        "users",
        vec![
            json!({"uid": "bltu1", "title": "Ana", "email": "Ana@Example.com"}),
            json!({"uid": "bltu2", "title": "Bo", "email": "bo@example.com"}),
        ],
    );

    let (status, body) =
        post_json(&app, "/api/user/check", json!({"email": "ana@example.COM"})).await;
    assert_eq!(status, 200);
    assert_eq!(body["exists"], true);
    assert_eq!(body["user"]["username"], "Ana");
    assert_eq!(body["user"]["email"], "Ana@Example.com");

    let (status, body) =
        post_json(&app, "/api/user/check", json!({"email": "cy@example.com"})).await;
    assert_eq!(status, 200);
    assert_eq!(body["exists"], false);
    assert!(body["user"].is_null());
}

/// (3) Create validates both fields.
#[actix_rt::test]
async fn test_create_user_requires_both_fields() {
    let (mock, app) = setup().await;

    for body in [
        json!({"email": "ana@example.com"}),
        json!({"username": "ana"}),
        json!({"username": "", "email": "ana@example.com"}),
    ] {
        let (status, body) = post_json(&app, "/api/user", body).await;
        assert_eq!(status, 400);
        assert_eq!(body["message"], "Username and email are required");
    }
    assert!(mock.requests().is_empty());
}

/// (4) Create stores `{title, email}` and publishes to the configured environment.
#[actix_rt::test]
async fn test_create_user_creates_and_publishes() {
    let (mock, app) = setup().await;

    let (status, body) = post_json(
        &app,
        "/api/user",
        json!({"username": "ana", "email": "ana@example.com"}),
    )
    .await;
    assert_eq!(status, 200, "create should succeed: {:?}", body);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "User information saved and published successfully"
    );
    let uid = body["entryUid"].as_str().unwrap().to_string();

    let creates = mock.requests_to("POST", USERS_ENTRIES);
    assert_eq!(creates.len(), 1);
    assert_eq!(
        creates[0].body.as_ref().unwrap()["entry"],
        json!({"title": "ana", "email": "ana@example.com"})
    );

    let publishes = mock.requests_to("POST", &format!("{}/{}/publish", USERS_ENTRIES, uid));
    assert_eq!(publishes.len(), 1);
    let publish = publishes[0].body.as_ref().unwrap();
    assert_eq!(publish["entry"]["environments"], json!([TEST_ENVIRONMENT]));
    assert_eq!(publish["entry"]["locales"], json!(["en-us"]));
    assert_eq!(publish["locale"], "en-us");

    // Published user is now visible to the check
    let (_, body) = post_json(&app, "/api/user/check", json!({"email": "ANA@example.com"})).await;
    assert_eq!(body["exists"], true);
}

/// (5) Publish failure is a 500 carrying the upstream message; the draft stays.
#[actix_rt::test]
async fn test_create_user_publish_failure() {
    let (mock, app) = setup().await;
    mock.fail_publish(true);

    let (status, body) = post_json(
        &app,
        "/api/user",
        json!({"username": "ana", "email": "ana@example.com"}),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "UPSTREAM_ERROR");
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Failed to save user information"));
    assert!(message.contains("Entry publishing failed."));

    assert_eq!(mock.stored("users").len(), 1);
}

/// (6) Without a management token nothing is sent and the call fails.
#[actix_rt::test]
async fn test_create_user_without_management_token() {
    let (mock, _) = setup().await;
    let mut cms = cms_settings(&mock);
    cms.management_token = None;
    let app = create_test_app(test_config(cms)).await;

    let (status, body) = post_json(
        &app,
        "/api/user",
        json!({"username": "ana", "email": "ana@example.com"}),
    )
    .await;
    assert_eq!(status, 500);
    assert!(body["message"].as_str().unwrap().contains("management token"));
    assert!(mock.requests().is_empty());
}

/// (7) A body that is not JSON is refused by the extractor with 400.
#[actix_rt::test]
async fn test_malformed_json_body_is_bad_request() {
    let (mock, app) = setup().await;

    for uri in ["/api/user/check", "/api/user"] {
        let req = test::TestRequest::post()
            .uri(uri)
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"email\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400, "{} should reject the body", uri);
    }
    assert!(mock.requests().is_empty());
}
