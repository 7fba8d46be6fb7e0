//! HTTP-level tests for the Notion client and the repository on top of it

use std::sync::Arc;

use notion_blog::config::NotionSettings;
use notion_blog::content::{ContentRepository, EntryOutcome, ListOutcome};
use notion_blog::notion::types::PropertyFilter;
use notion_blog::notion::{NotionApi, NotionClient, NotionError, QueryRequest};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DB: &str = "0123456789abcdef0123456789abcdef";

fn settings(server: &MockServer) -> NotionSettings {
    NotionSettings {
        api_url: format!("{}/v1", server.uri()),
        ..Default::default()
    }
}

fn client(server: &MockServer) -> NotionClient {
    NotionClient::new(&settings(server), Some("secret-token".to_string())).unwrap()
}

fn page(id: &str, title: &str, slug: &str, date: &str) -> serde_json::Value {
    json!({
        "object": "page",
        "id": id,
        "parent": {"type": "database_id", "database_id": DB},
        "archived": false,
        "properties": {
            "Title": {"id": "title", "type": "title", "title": [
                {"type": "text", "text": {"content": title}, "plain_text": title, "href": null}
            ]},
            "Slug": {"id": "s", "type": "formula", "formula": {"type": "string", "string": slug}},
            "Status": {"id": "st", "type": "status", "status": {"id": "1", "name": "Published", "color": "green"}},
            "PublishedDate": {"id": "d", "type": "date", "date": {"start": date, "end": null, "time_zone": null}},
            "CoverImage": {"id": "c", "type": "files", "files": []},
            "Description": {"id": "x", "type": "rich_text", "rich_text": []}
        }
    })
}

fn list(results: Vec<serde_json::Value>, next_cursor: Option<&str>) -> serde_json::Value {
    json!({
        "object": "list",
        "results": results,
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor
    })
}

#[tokio::test]
async fn query_sends_auth_version_and_filter() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/databases/{}/query", DB)))
        .and(header("authorization", "Bearer secret-token"))
        .and(header("notion-version", "2022-06-28"))
        .and(body_partial_json(json!({
            "filter": {"property": "Status", "status": {"equals": "Published"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(
            vec![page("p1", "Hello", "hello", "2024-01-15")],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let request = QueryRequest::filtered(PropertyFilter::status_equals("Status", "Published"));
    let result = client(&server).query_database(DB, &request).await.unwrap();

    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].id, "p1");
    assert!(!result.has_more);
}

#[tokio::test]
async fn api_errors_carry_status_and_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/pages/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "object": "error",
            "status": 404,
            "code": "object_not_found",
            "message": "Could not find page with ID: missing."
        })))
        .mount(&server)
        .await;

    let err = client(&server).retrieve_page("missing").await.unwrap_err();
    match &err {
        NotionError::Api { status, code, .. } => {
            assert_eq!(*status, 404);
            assert_eq!(code, "object_not_found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.is_not_found());
}

#[tokio::test]
async fn non_json_error_body_is_kept_as_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/pages/p1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client(&server).retrieve_page("p1").await.unwrap_err();
    assert!(matches!(
        err,
        NotionError::Api { status: 502, ref message, .. } if message == "Bad Gateway"
    ));
}

#[tokio::test]
async fn block_children_follow_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/blocks/p1/children"))
        .and(query_param("page_size", "100"))
        .and(query_param("start_cursor", "next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(
            vec![json!({
                "object": "block", "id": "b2", "type": "paragraph", "has_children": false,
                "paragraph": {"rich_text": [{"type": "text", "plain_text": "Second"}], "color": "default"}
            })],
            None,
        )))
        .mount(&server)
        .await;

    let result = client(&server)
        .block_children("p1", Some("next"))
        .await
        .unwrap();
    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].id, "b2");
}

#[tokio::test]
async fn repository_lists_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/databases/{}/query", DB)))
        .and(body_partial_json(json!({"start_cursor": "c2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(
            vec![page("p2", "Older", "older", "2023-12-01")],
            None,
        )))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/databases/{}/query", DB)))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(
            vec![page("p1", "Newer", "newer", "2024-01-15")],
            Some("c2"),
        )))
        .mount(&server)
        .await;

    let repo = ContentRepository::new(
        Arc::new(client(&server)),
        Some(DB.to_string()),
        settings(&server),
    );

    match repo.list_published().await {
        ListOutcome::Entries(entries) => {
            let slugs: Vec<&str> = entries.iter().map(|e| e.slug.as_str()).collect();
            assert_eq!(slugs, vec!["newer", "older"]);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn repository_fetches_post_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/databases/{}/query", DB)))
        .and(body_partial_json(json!({
            "filter": {"property": "Slug", "formula": {"string": {"equals": "hello"}}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(
            vec![page("p1", "Hello", "hello", "2024-01-15")],
            None,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/blocks/p1/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list(
            vec![
                json!({
                    "object": "block", "id": "b1", "type": "heading_1", "has_children": false,
                    "heading_1": {"rich_text": [{"type": "text", "plain_text": "Intro"}]}
                }),
                json!({
                    "object": "block", "id": "b2", "type": "paragraph", "has_children": false,
                    "paragraph": {"rich_text": [{"type": "text", "plain_text": "Body text."}]}
                }),
            ],
            None,
        )))
        .mount(&server)
        .await;

    let repo = ContentRepository::new(
        Arc::new(client(&server)),
        Some(DB.to_string()),
        settings(&server),
    );

    match repo.get_by_slug("hello").await {
        EntryOutcome::Found(entry) => {
            assert_eq!(entry.title, "Hello");
            assert_eq!(entry.content.as_deref(), Some("# Intro\n\nBody text."));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn repository_is_unavailable_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "object": "error", "status": 500, "code": "internal_server_error", "message": "boom"
        })))
        .mount(&server)
        .await;

    let repo = ContentRepository::new(
        Arc::new(client(&server)),
        Some(DB.to_string()),
        settings(&server),
    );

    assert!(matches!(
        repo.list_published().await,
        ListOutcome::Unavailable(NotionError::Api { status: 500, .. })
    ));
    assert!(matches!(
        repo.get_by_slug("hello").await,
        EntryOutcome::Unavailable(_)
    ));
}

#[tokio::test]
async fn missing_token_never_reaches_the_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = NotionClient::new(&settings(&server), None).unwrap();
    let repo = ContentRepository::new(Arc::new(client), Some(DB.to_string()), settings(&server));

    assert!(matches!(
        repo.list_published().await,
        ListOutcome::Unavailable(NotionError::MissingCredential("NOTION_TOKEN"))
    ));
}
