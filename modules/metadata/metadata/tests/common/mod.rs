#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use marquee_http::{HttpServer, apply_middleware};
use metadata::{InMemoryMetadataRepository, MetadataService};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

pub fn app() -> Router {
    let service = Arc::new(MetadataService::new(Arc::new(InMemoryMetadataRepository::new())));
    apply_middleware(metadata::router(service), "metadata", Duration::from_secs(5))
}

pub async fn send(app: &Router, req: Request<Body>) -> (axum::http::StatusCode, serde_json::Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn put_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::put(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn start_server() -> HttpServer {
    HttpServer::start("metadata", "127.0.0.1:0", app(), CancellationToken::new())
        .await
        .unwrap()
}

/// A live server that answers on the address but serves none of the metadata
/// routes, like a stale registration whose port was reused.
pub async fn start_unrelated_server() -> HttpServer {
    let router = apply_middleware(Router::new(), "unrelated", Duration::from_secs(5));
    HttpServer::start("unrelated", "127.0.0.1:0", router, CancellationToken::new())
        .await
        .unwrap()
}
