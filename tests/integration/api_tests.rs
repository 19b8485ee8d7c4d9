//! HTTP client tests against a wiremock server

use crawl_deck::config::ApiConfig;
use crawl_deck::model::{BrokenLinksField, CrawlStatus, RecordId};
use crawl_deck::{ApiError, CrawlApi, HttpCrawlApi};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn create_test_api() -> (MockServer, HttpCrawlApi) {
    let server = MockServer::start().await;
    let config = ApiConfig {
        base_url: format!("{}/api", server.uri()),
        ..ApiConfig::default()
    };
    let api = HttpCrawlApi::new(&config).expect("client should build");
    (server, api)
}

#[tokio::test]
async fn test_list_records_tolerates_partial_rows() {
    let (server, api) = create_test_api().await;

    Mock::given(method("GET"))
        .and(path("/api/urls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "urls": [
                {
                    "id": 1,
                    "url": "https://example.com",
                    "status": "done",
                    "title": "Example Domain",
                    "html_version": "HTML5",
                    "h1": 1,
                    "h2": 3,
                    "internal_links": 4,
                    "external_links": 1,
                    "broken_links": 2,
                    "has_login_form": true,
                    "created_at": "2024-03-01 12:30:00"
                },
                {
                    "id": 2,
                    "url": "https://queued.example",
                    "status": "queued",
                    "title": null,
                    "html_version": null,
                    "broken_links": null
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = api.list_records().await.unwrap();
    assert_eq!(records.len(), 2);

    let done = &records[0];
    assert_eq!(done.status, CrawlStatus::Done);
    assert_eq!(done.h1_count, 1);
    assert_eq!(done.h2_count, 3);
    assert_eq!(done.broken_link_count(), 2);
    assert!(done.has_login_form);
    assert!(done.created_at.is_some());

    let queued = &records[1];
    assert_eq!(queued.status, CrawlStatus::Queued);
    assert_eq!(queued.title, "");
    assert_eq!(queued.broken_links, BrokenLinksField::Count(0));
}

#[tokio::test]
async fn test_get_record_with_embedded_broken_links() {
    let (server, api) = create_test_api().await;

    Mock::given(method("GET"))
        .and(path("/api/urls/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "url": "https://example.com",
            "status": "done",
            "broken_links": [
                {"id": 1, "url_id": 5, "link": "https://example.com/gone", "status": 404},
                {"id": 2, "url_id": 5, "link": "https://down.example", "status": 0}
            ]
        })))
        .mount(&server)
        .await;

    let record = api.get_record(&RecordId::Number(5)).await.unwrap();
    let links = record.broken_links.embedded().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[1].status_label(), "unreachable");
}

#[tokio::test]
async fn test_list_broken_links() {
    let (server, api) = create_test_api().await;

    Mock::given(method("GET"))
        .and(path("/api/urls/5/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "broken_links": [
                {"id": 9, "url_id": 5, "link": "https://example.com/old", "status": 410}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let links = api.list_broken_links(&RecordId::Number(5)).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].status, 410);
    assert_eq!(links[0].url_id, Some(RecordId::Number(5)));
}

#[tokio::test]
async fn test_create_posts_url_and_reads_id() {
    let (server, api) = create_test_api().await;

    Mock::given(method("POST"))
        .and(path("/api/urls"))
        .and(body_json(json!({"url": "https://new.example"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 17})))
        .expect(1)
        .mount(&server)
        .await;

    let created = api.create_record("https://new.example").await.unwrap();
    assert_eq!(created.unwrap().id, RecordId::Number(17));
}

#[tokio::test]
async fn test_create_with_empty_body() {
    let (server, api) = create_test_api().await;

    Mock::given(method("POST"))
        .and(path("/api/urls"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    assert!(api.create_record("https://new.example").await.unwrap().is_none());
}

#[tokio::test]
async fn test_bulk_endpoints_send_ids() {
    let (server, api) = create_test_api().await;

    Mock::given(method("POST"))
        .and(path("/api/urls/bulk-delete"))
        .and(body_json(json!({"ids": [1, 2]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": 2})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/urls/bulk-restart"))
        .and(body_json(json!({"ids": [3]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    api.bulk_delete(&[RecordId::Number(1), RecordId::Number(2)])
        .await
        .unwrap();
    api.bulk_rerun(&[RecordId::Number(3)]).await.unwrap();
}

#[tokio::test]
async fn test_single_record_mutations() {
    let (server, api) = create_test_api().await;

    Mock::given(method("DELETE"))
        .and(path("/api/urls/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/urls/7/start"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/urls/7/stop"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let id = RecordId::Number(7);
    api.delete_record(&id).await.unwrap();
    api.start(&id).await.unwrap();
    api.stop(&id).await.unwrap();
}

#[tokio::test]
async fn test_error_body_becomes_message() {
    let (server, api) = create_test_api().await;

    Mock::given(method("POST"))
        .and(path("/api/urls"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid URL"})))
        .mount(&server)
        .await;

    let err = api.create_record("https://bad.example").await.unwrap_err();
    match err {
        ApiError::Status {
            status, message, ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid URL");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_record_maps_to_404() {
    let (server, api) = create_test_api().await;

    Mock::given(method("GET"))
        .and(path("/api/urls/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "URL not found"})))
        .mount(&server)
        .await;

    let err = api.get_record(&RecordId::Number(99)).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("URL not found"));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (server, api) = create_test_api().await;

    Mock::given(method("GET"))
        .and(path("/api/urls"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api.list_records().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

