use std::{net::SocketAddr, time::Duration};

use axum::{http::StatusCode, response::Html, routing::get, Router};
use tokio::net::TcpListener;
use wine_radar::data::{
    fetch::{PageFetcher, PageSource},
    FailureKind, Fetched,
};

const REVIEW_PAGE: &str = r#"<html><head><title>Bedeau 2020</title><script>track()</script></head>
<body><nav>Home | Wines</nav><article><h1>Bedeau Rouge 2020</h1>
<p>Volatile lift, horse saddle and sour cherry. Grippy, fresh, twelve percent.</p></article>
<footer>All rights reserved</footer></body></html>"#;

async fn spawn_site() -> SocketAddr {
    let app = Router::new()
        .route("/review", get(|| async { Html(REVIEW_PAGE) }))
        .route("/tiny", get(|| async { Html("<p>hi</p>") }))
        .route(
            "/accents",
            get(|| async { Html(format!("<p>{}</p>", "é".repeat(60))) }),
        )
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, Html(REVIEW_PAGE)) }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Html(REVIEW_PAGE)
            }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn fetcher() -> PageFetcher {
    PageFetcher::new(Duration::from_millis(500), 3000).unwrap()
}

#[tokio::test]
async fn extracts_visible_text_from_ok_pages() {
    let addr = spawn_site().await;
    let text = fetcher()
        .fetch_text(&format!("http://{addr}/review"))
        .await
        .content()
        .unwrap();
    assert!(text.starts_with("Bedeau 2020 Bedeau Rouge 2020 Volatile lift"));
    assert!(!text.contains("track()"));
    assert!(!text.contains("Home | Wines"));
    assert!(!text.contains("All rights reserved"));
}

#[tokio::test]
async fn failures_become_unavailable_with_a_kind() {
    let addr = spawn_site().await;
    let fetcher = fetcher();

    let missing = fetcher.fetch_text(&format!("http://{addr}/missing")).await;
    assert_eq!(missing.failure().unwrap().kind, FailureKind::Status(404));

    let tiny = fetcher.fetch_text(&format!("http://{addr}/tiny")).await;
    assert_eq!(tiny.failure().unwrap().kind, FailureKind::TooShort);

    // 127 bytes but only 67 characters
    let accents = fetcher.fetch_text(&format!("http://{addr}/accents")).await;
    assert_eq!(accents.failure().unwrap().kind, FailureKind::TooShort);

    let slow = fetcher.fetch_text(&format!("http://{addr}/slow")).await;
    assert_eq!(slow.failure().unwrap().kind, FailureKind::Timeout);
    assert!(slow.failure().unwrap().kind.is_transient());
}

#[tokio::test]
async fn refused_connections_are_not_errors() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetched = fetcher().fetch_text(&format!("http://{addr}/gone")).await;
    assert!(matches!(fetched, Fetched::Unavailable(_)));
    assert_eq!(fetched.unwrap_or_empty(), "");
}

#[tokio::test]
async fn malformed_urls_are_unavailable() {
    let fetched = fetcher().fetch_text("not a url").await;
    assert!(!fetched.is_content());
}
