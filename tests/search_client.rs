use std::{net::SocketAddr, time::Duration};

use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wine_radar::data::{
    search::{SearchBackend, SerperClient},
    FailureKind, Fetched,
};

async fn search(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("serper-key") {
        return (StatusCode::FORBIDDEN, Json(json!({ "message": "bad key" })));
    }
    let query = body["q"].as_str().unwrap_or_default().to_string();
    let num = body["num"].as_u64().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({
            "searchParameters": { "q": query },
            "organic": [
                { "title": format!("{query} / {num}"), "link": "https://blog.example/bedeau", "snippet": "Wild and smoky." },
                { "link": "https://shop.example/bedeau" }
            ]
        })),
    )
}

async fn spawn_serper() -> SocketAddr {
    let app = Router::new()
        .route("/search", post(search))
        .route("/empty", post(|| async { Json(json!({ "searchParameters": {} })) }))
        .route(
            "/down",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "try later") }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr, path: &str) -> SerperClient {
    SerperClient::new(Some("serper-key".into()), Duration::from_secs(2))
        .unwrap()
        .with_base_url(format!("http://{addr}{path}"))
}

#[tokio::test]
async fn sends_key_query_and_result_count() {
    let addr = spawn_serper().await;
    let hits = client(addr, "/search")
        .search("Bedeau 2020 tasting notes review", 5)
        .await
        .content()
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "Bedeau 2020 tasting notes review / 5");
    assert_eq!(hits[0].snippet, "Wild and smoky.");
    assert_eq!(hits[1].link, "https://shop.example/bedeau");
    assert!(hits[1].title.is_empty());
    assert!(hits[1].snippet.is_empty());
}

#[tokio::test]
async fn missing_organic_block_means_no_hits() {
    let addr = spawn_serper().await;
    let hits = client(addr, "/empty").search("Bedeau", 5).await;
    assert_eq!(hits, Fetched::Content(Vec::new()));
}

#[tokio::test]
async fn error_statuses_are_unavailable() {
    let addr = spawn_serper().await;

    let down = client(addr, "/down").search("Bedeau", 5).await;
    let why = down.failure().unwrap();
    assert_eq!(why.kind, FailureKind::Status(503));
    assert!(why.kind.is_transient());

    let wrong_key = SerperClient::new(Some("other".into()), Duration::from_secs(2))
        .unwrap()
        .with_base_url(format!("http://{addr}/search"))
        .search("Bedeau", 5)
        .await;
    assert_eq!(wrong_key.failure().unwrap().kind, FailureKind::Status(403));
}

#[tokio::test]
async fn missing_key_skips_the_request() {
    let client = SerperClient::new(None, Duration::from_secs(2))
        .unwrap()
        .with_base_url("http://127.0.0.1:9/search");
    let hits = client.search("Bedeau", 5).await;
    assert_eq!(hits.failure().unwrap().kind, FailureKind::NotConfigured);
}
