//! Contract Test: DigitalOcean API Usage
//!
//! Runs the store (and the reconciler on top of it) against a local mock of
//! the domain-records API and checks the exact requests issued.

use doacme_core::traits::{PageToken, RecordRequest, RecordStore};
use doacme_core::{Action, DoacmeConfig, Error, Intents, Outcome, RecordConfig, Reconciler};
use doacme_provider_digitalocean::DigitalOceanStore;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECORDS_PATH: &str = "/v2/domains/example.com/records";

fn store(server: &MockServer) -> DigitalOceanStore {
    DigitalOceanStore::new_live("test-token")
        .unwrap()
        .with_base_url(format!("{}/v2", server.uri()))
        .with_page_size(2)
}

fn api_record(id: u64, record_type: &str, name: &str, data: &str, ttl: u32) -> serde_json::Value {
    json!({
        "id": id,
        "type": record_type,
        "name": name,
        "data": data,
        "priority": null,
        "port": null,
        "ttl": ttl,
        "weight": null,
        "flags": null,
        "tag": null
    })
}

fn acme_request(data: &str) -> RecordRequest {
    RecordRequest {
        record_type: "TXT".to_string(),
        name: "_acme-challenge".to_string(),
        data: data.to_string(),
        ttl: 300,
        priority: None,
        port: None,
        weight: None,
    }
}

#[tokio::test]
async fn listing_follows_next_link() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "domain_records": [
                api_record(1, "A", "www", "192.0.2.1", 3600),
                api_record(2, "A", "mail", "192.0.2.2", 3600)
            ],
            "links": {
                "pages": {
                    "next": format!("{}{}?page=2&per_page=2", server.uri(), RECORDS_PATH),
                    "last": format!("{}{}?page=2&per_page=2", server.uri(), RECORDS_PATH)
                }
            },
            "meta": { "total": 3 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "domain_records": [api_record(3, "TXT", "_acme-challenge", "abc123", 300)],
            "links": {},
            "meta": { "total": 3 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server);

    let first = store.list_records("example.com", None).await.unwrap();
    assert_eq!(first.records.len(), 2);
    assert_eq!(first.records[0].id, "1");
    let next = first.next.expect("second page");
    assert_eq!(next, PageToken::new("2"));

    let second = store.list_records("example.com", Some(next)).await.unwrap();
    assert_eq!(second.records.len(), 1);
    assert_eq!(second.records[0].name, "_acme-challenge");
    assert!(second.next.is_none());
}

#[tokio::test]
async fn create_posts_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .and(body_json(json!({
            "type": "TXT",
            "name": "_acme-challenge",
            "data": "abc123",
            "ttl": 300
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "domain_record": api_record(77, "TXT", "_acme-challenge", "abc123", 300)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = store(&server)
        .create_record("example.com", &acme_request("abc123"))
        .await
        .unwrap();

    assert_eq!(created.id, "77");
    assert_eq!(created.data, "abc123");
}

#[tokio::test]
async fn edit_puts_record_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{}/42", RECORDS_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "domain_record": api_record(42, "TXT", "_acme-challenge", "new", 300)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let edited = store(&server)
        .edit_record("example.com", "42", &acme_request("new"))
        .await
        .unwrap();

    assert_eq!(edited.id, "42");
    assert_eq!(edited.data, "new");
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{}/42", RECORDS_PATH)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store(&server).delete_record("example.com", "42").await.unwrap();
}

#[tokio::test]
async fn status_codes_map_to_errors() {
    let cases = [
        (401u16, "auth"),
        (403, "auth"),
        (404, "not_found"),
        (429, "rate_limited"),
        (503, "provider"),
        (422, "provider"),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(RECORDS_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "id": "error",
                "message": "something went wrong"
            })))
            .mount(&server)
            .await;

        let err = store(&server).list_records("example.com", None).await.unwrap_err();
        let matched = match expected {
            "auth" => matches!(err, Error::Authentication(_)),
            "not_found" => matches!(err, Error::NotFound(_)),
            "rate_limited" => matches!(err, Error::RateLimited(_)),
            _ => matches!(err, Error::Provider { .. }),
        };
        assert!(matched, "status {} mapped to {:?}", status, err);
        assert!(!err.to_string().contains("test-token"));
    }
}

#[tokio::test]
async fn dry_run_never_mutates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let store = DigitalOceanStore::new_dry_run("test-token")
        .unwrap()
        .with_base_url(format!("{}/v2", server.uri()));

    let created = store
        .create_record("example.com", &acme_request("abc123"))
        .await
        .unwrap();
    assert_eq!(created.data, "abc123");

    let edited = store
        .edit_record("example.com", "42", &acme_request("new"))
        .await
        .unwrap();
    assert_eq!(edited.id, "42");

    store.delete_record("example.com", "42").await.unwrap();
}

#[tokio::test]
async fn reconciler_updates_stale_record_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "domain_records": [
                api_record(10, "A", "@", "192.0.2.1", 3600),
                api_record(11, "TXT", "_acme-challenge", "old", 300)
            ],
            "links": {},
            "meta": { "total": 2 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{}/11", RECORDS_PATH)))
        .and(body_json(json!({
            "type": "TXT",
            "name": "_acme-challenge",
            "data": "abc123",
            "ttl": 300
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "domain_record": api_record(11, "TXT", "_acme-challenge", "abc123", 300)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = DoacmeConfig::new(
        "example.com",
        "test-token",
        RecordConfig::new("TXT", "_acme-challenge")
            .with_data("abc123")
            .with_ttl(300),
    )
    .with_intents(Intents::upsert());

    let reconciler = Reconciler::new(Box::new(store(&server)), &config).unwrap();
    let outcome = reconciler.run().await.unwrap();

    assert_eq!(outcome.action(), Action::Update);
    let Outcome::Updated { current, .. } = outcome else {
        panic!("expected Updated");
    };
    assert_eq!(current.data, "abc123");
}

#[tokio::test]
async fn reconciler_skips_write_for_matching_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "domain_records": [api_record(11, "TXT", "_acme-challenge", "abc123", 300)],
            "links": {},
            "meta": { "total": 1 }
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = DoacmeConfig::new(
        "example.com",
        "test-token",
        RecordConfig::new("TXT", "_acme-challenge")
            .with_data("abc123")
            .with_ttl(300),
    )
    .with_intents(Intents::upsert());

    let reconciler = Reconciler::new(Box::new(store(&server)), &config).unwrap();
    let outcome = reconciler.run().await.unwrap();

    assert_eq!(outcome.action(), Action::NoOp);
}
