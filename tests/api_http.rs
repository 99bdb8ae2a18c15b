// tests/api_http.rs
//
// HTTP-level tests for the liveness router without opening sockets.

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use tower::ServiceExt as _; // for `oneshot`

use echosight_collector::api;

const BODY_LIMIT: usize = 64 * 1024;

#[tokio::test]
async fn health_returns_200_and_fixed_body() {
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = api::router().oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    assert_eq!(
        String::from_utf8(bytes.to_vec()).unwrap(),
        "Collector Service is operational"
    );
}

#[tokio::test]
async fn no_other_routes() {
    for uri in ["/", "/metrics", "/mentions"] {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let resp = api::router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}
