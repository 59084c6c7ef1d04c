use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use realty_core::config::UpstreamConfig;
use realty_core::error::Error;
use realty_core::traits::{ListingSource, TitleRegistry};
use realty_core::types::ListingQuery;
use realty_upstream::{ListingsClient, TitleRegistryClient};

/// Serve `app` on an ephemeral local port and return its base URL.
async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn header(headers: &HeaderMap, name: &str) -> Value {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map_or(Value::Null, |v| Value::String(v.to_string()))
}

async fn fake_listings(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    Json(json!({
        "nbHits": 3,
        "hits": [{"id": 1}, {"id": 2}, {"id": 3}],
        "echo": {
            "query": params,
            "key": header(&headers, "x-rapidapi-key"),
            "host": header(&headers, "x-rapidapi-host"),
        }
    }))
}

async fn fake_deed(Path(number): Path<String>, headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "title_deed_number": number,
        "status": "VERIFIED",
        "auth": header(&headers, "authorization"),
    }))
}

fn fake_registry() -> Router {
    Router::new()
        .route("/properties/list", get(fake_listings))
        .route("/api/property/title-deed/{number}", get(fake_deed))
        .route(
            "/broken/properties/list",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "upstream overloaded") }),
        )
        .route("/html/properties/list", get(|| async { "<html>not json</html>" }))
}

fn listings(base_url: &str, key: Option<&str>) -> ListingsClient {
    let config = UpstreamConfig::new(base_url, key.map(str::to_string));
    ListingsClient::new(&config, Duration::from_secs(5)).unwrap()
}

fn query() -> ListingQuery {
    ListingQuery {
        location: "5002".into(),
        purpose: "for-sale".into(),
        min_price: Some(900_000_u64.into()),
        max_price: None,
        property_type: Some("Townhouse".into()),
    }
}

#[tokio::test]
async fn search_forwards_query_and_headers() {
    let base = spawn_upstream(fake_registry()).await;
    let results = listings(&base, Some("secret-key")).search(&query()).await.unwrap();

    assert_eq!(results.total, 3);
    let echo = &results.payload["echo"];
    assert_eq!(echo["key"], "secret-key");
    assert_eq!(echo["host"], "127.0.0.1");
    assert_eq!(echo["query"]["locationExternalIDs"], "5002");
    assert_eq!(echo["query"]["purpose"], "for-sale");
    assert_eq!(echo["query"]["hitsPerPage"], "25");
    assert_eq!(echo["query"]["page"], "0");
    assert_eq!(echo["query"]["sort"], "date-desc");
    assert_eq!(echo["query"]["priceMin"], "900000");
    assert_eq!(echo["query"]["categoryExternalID"], "18");
    assert!(echo["query"].get("priceMax").is_none());
}

#[tokio::test]
async fn search_without_key_never_calls_upstream() {
    // Nothing listens on this address; a network attempt would surface as UpstreamUnavailable.
    let err = listings("http://127.0.0.1:9", None)
        .search(&query())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingCredential(_)));
}

#[tokio::test]
async fn non_success_status_is_classified() {
    let base = spawn_upstream(fake_registry()).await;
    let err = listings(&format!("{base}/broken"), Some("k"))
        .search(&query())
        .await
        .unwrap_err();

    assert!(!err.to_string().contains("overloaded"));
    match err {
        Error::UpstreamStatus { status, .. } => assert_eq!(status, 503),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_payload_is_classified() {
    let base = spawn_upstream(fake_registry()).await;
    let err = listings(&format!("{base}/html"), Some("k"))
        .search(&query())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UpstreamPayload { .. }));
}

#[tokio::test]
async fn unreachable_upstream_is_classified() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = listings(&format!("http://{addr}"), Some("k"))
        .search(&query())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UpstreamUnavailable { .. }));
}

#[tokio::test]
async fn verify_sends_bearer_token() {
    let base = spawn_upstream(fake_registry()).await;
    let config = UpstreamConfig::new(base, Some("tok-123".into()));
    let client = TitleRegistryClient::new(&config, Duration::from_secs(5)).unwrap();

    let payload = client.verify("TD 2024").await.unwrap();
    assert_eq!(payload["title_deed_number"], "TD 2024");
    assert_eq!(payload["status"], "VERIFIED");
    assert_eq!(payload["auth"], "Bearer tok-123");
}

#[tokio::test]
async fn verify_without_token_fails() {
    let config = UpstreamConfig::new("http://127.0.0.1:9", None);
    let client = TitleRegistryClient::new(&config, Duration::from_secs(5)).unwrap();
    let err = client.verify("TD-1").await.unwrap_err();
    assert!(matches!(err, Error::MissingCredential(_)));
}

#[tokio::test]
async fn verify_rejects_blank_number() {
    let config = UpstreamConfig::new("http://127.0.0.1:9", Some("t".into()));
    let client = TitleRegistryClient::new(&config, Duration::from_secs(5)).unwrap();
    let err = client.verify("   ").await.unwrap_err();
    assert!(err.is_client_error());
}
