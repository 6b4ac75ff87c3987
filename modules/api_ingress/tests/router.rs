//! Host routes and middleware limits of the ingress router.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    routing::post,
    Router,
};
use tower::util::ServiceExt;
use utoipa::OpenApi;

use api_ingress::{ApiIngress, ApiIngressConfig};

#[derive(OpenApi)]
#[openapi(info(title = "Test API", version = "0.0.1"))]
struct TestDoc;

fn ingress(cfg: ApiIngressConfig) -> ApiIngress {
    ApiIngress::new(cfg)
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = ingress(ApiIngressConfig::default()).build_router(Router::new());
    let resp = get(app, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn openapi_is_served_once_registered() {
    let host = ingress(ApiIngressConfig::default());
    let resp = get(host.build_router(Router::new()), "/openapi.json").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    host.set_openapi(TestDoc::openapi());
    let resp = get(host.build_router(Router::new()), "/openapi.json").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["info"]["title"], "Test API");
}

#[tokio::test]
async fn docs_page_follows_config() {
    let host = ingress(ApiIngressConfig::default());
    host.set_openapi(TestDoc::openapi());
    let resp = get(host.build_router(Router::new()), "/docs").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let host = ingress(ApiIngressConfig {
        enable_docs: true,
        ..Default::default()
    });
    host.set_openapi(TestDoc::openapi());
    let resp = get(host.build_router(Router::new()), "/docs").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let api = Router::new().route("/sink", post(|body: String| async move { body.len().to_string() }));
    let app = ingress(ApiIngressConfig {
        body_limit_bytes: 16,
        ..Default::default()
    })
    .build_router(api);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/sink")
                .body(Body::from("small"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/sink")
                .body(Body::from(vec![b'x'; 64]))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn serve_stops_on_cancellation() {
    let host = ingress(ApiIngressConfig::default());
    let cancel = tokio_util::sync::CancellationToken::new();
    cancel.cancel();
    let addr = "127.0.0.1:0".parse().unwrap();
    host.serve(Router::new(), addr, cancel).await.unwrap();
}
