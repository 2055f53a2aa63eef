#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use axum::Router;
use axum::routing::get;
use marquee_http::{HttpServer, apply_middleware};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

async fn raw_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET {path} HTTP/1.1\r\nhost: {addr}\r\nconnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();
    let mut buf = String::new();
    stream.read_to_string(&mut buf).await.unwrap();
    buf
}

#[tokio::test]
async fn serves_until_cancelled() {
    let cancel = CancellationToken::new();
    let router = apply_middleware(Router::new(), "test", Duration::from_secs(1));
    let server = HttpServer::start("test", "127.0.0.1:0", router, cancel.clone())
        .await
        .unwrap();
    let addr = server.local_addr();

    let resp = raw_get(addr, "/healthz").await;
    assert!(resp.starts_with("HTTP/1.1 200"), "{resp}");

    server.stop(Duration::from_secs(2)).await.unwrap();
    assert!(cancel.is_cancelled());
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn in_flight_request_completes_during_shutdown() {
    let router = Router::new().route(
        "/work",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            "done"
        }),
    );
    let server = HttpServer::start(
        "test",
        "127.0.0.1:0",
        apply_middleware(router, "test", Duration::from_secs(5)),
        CancellationToken::new(),
    )
    .await
    .unwrap();
    let addr = server.local_addr();

    let request = tokio::spawn(async move { raw_get(addr, "/work").await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    server.stop(Duration::from_secs(2)).await.unwrap();

    let resp = request.await.unwrap();
    assert!(resp.starts_with("HTTP/1.1 200"), "{resp}");
    assert!(resp.ends_with("done"));
}

#[tokio::test]
async fn binding_a_taken_port_fails() {
    let first = HttpServer::start("a", "127.0.0.1:0", Router::new(), CancellationToken::new())
        .await
        .unwrap();
    let taken = first.local_addr().to_string();
    let err = HttpServer::start("b", &taken, Router::new(), CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, marquee_http::ServerError::Bind { .. }));
    first.stop(Duration::from_secs(1)).await.unwrap();
}
