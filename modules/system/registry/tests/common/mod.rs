#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use marquee_http::{HttpServer, apply_middleware};
use registry::InMemoryRegistry;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

pub fn app(registry: Arc<InMemoryRegistry>) -> Router {
    apply_middleware(registry::router(registry), "registry", Duration::from_secs(5))
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
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

pub fn request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn start_server(registry: Arc<InMemoryRegistry>) -> HttpServer {
    HttpServer::start("registry", "127.0.0.1:0", app(registry), CancellationToken::new())
        .await
        .unwrap()
}
