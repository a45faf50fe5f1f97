//! E2E tests: Contentstack client write operations against the mock stack.

use qa_dashboard_lib::services::{CmsError, ContentRepository, ContentstackClient};
use secrecy::SecretString;
use serde_json::json;

use super::mock_contentstack::MockContentstack;
use super::test_helpers::*;

async fn client() -> (MockContentstack, ContentstackClient) {
    let mock = MockContentstack::start().await;
    let client = ContentstackClient::new(cms_settings(&mock));
    (mock, client)
}

/// (1) Create, publish, update, unpublish, then delete one entry.
#[actix_rt::test]
async fn test_entry_lifecycle() {
    let (mock, client) = client().await;

    let created = client
        .create_entry("notes", json!({"title": "draft", "body": "v1"}))
        .await
        .unwrap();
    let uid = created["uid"].as_str().unwrap().to_string();
    assert_eq!(created["title"], "draft");

    // Not visible on the delivery side until published
    assert!(client.fetch_entry("notes", &uid).await.unwrap().is_none());

    client.publish_entry("notes", &uid).await.unwrap();
    let fetched = client.fetch_entry("notes", &uid).await.unwrap().unwrap();
    assert_eq!(fetched["body"], "v1");

    let updated = client
        .update_entry("notes", &uid, json!({"body": "v2"}))
        .await
        .unwrap();
    assert_eq!(updated["body"], "v2");
    assert_eq!(updated["title"], "draft");

    client.unpublish_entry("notes", &uid).await.unwrap();
    assert!(client.fetch_page("notes", 0, 100).await.unwrap().is_empty());
    let unpublish = mock
        .requests_to("POST", &format!("/v3/content_types/notes/entries/{}/unpublish", uid))
        .pop()
        .unwrap();
    assert_eq!(
        unpublish.body.unwrap()["entry"]["environments"],
        json!([TEST_ENVIRONMENT])
    );

    client.delete_entry("notes", &uid).await.unwrap();
    assert!(mock.stored("notes").is_empty());

    let writes: Vec<_> = mock
        .requests()
        .into_iter()
        .filter(|r| r.method != "GET")
        .collect();
    assert!(writes.iter().all(|r| r.query.get("locale").is_none_or(|l| l == "en-us")));
}

/// (2) Upstream error bodies surface as `Api` with status and message.
#[actix_rt::test]
async fn test_api_errors_carry_upstream_message() {
    let (_mock, client) = client().await;

    let err = client.delete_entry("notes", "blt-missing").await.unwrap_err();
    match err {
        CmsError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "The requested object doesn't exist.");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

/// (3) Wrong tokens are rejected by the stack; reads and writes use different ones.
#[actix_rt::test]
async fn test_tokens_are_scoped_to_their_api() {
    let mock = MockContentstack::start().await;
    mock.seed("notes", vec![json!({"uid": "blt1", "title": "seeded"})]);

    let mut settings = cms_settings(&mock);
    settings.management_token = Some(SecretString::from("wrong"));
    let client = ContentstackClient::new(settings);

    // Reads still work with the delivery token
    let page = client.fetch_page("notes", 0, 100).await.unwrap();
    assert_eq!(page.len(), 1);

    let err = client
        .create_entry("notes", json!({"title": "x"}))
        .await
        .unwrap_err();
    assert!(matches!(err, CmsError::Api { status: 401, .. }));
}
