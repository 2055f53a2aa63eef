use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::routing::get;
use marquee_errors::Problem;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

pub const HEALTH_PATH: &str = "/healthz";

/// Fallback for unmatched routes.
pub async fn route_not_found(req: Request<Body>) -> Problem {
    let path = req.uri().path().to_owned();
    Problem::coded(
        StatusCode::NOT_FOUND,
        "ROUTE_NOT_FOUND",
        "Not found",
        format!("no route for {} {path}", req.method()),
    )
    .with_instance(path)
}

/// Wrap `router` with the stack shared by all services.
///
/// Requests flow: trace span, then timeout, then the router. A request that
/// exceeds `request_timeout` is answered with 504 and its handler future is
/// dropped, cancelling any remote calls it had in flight.
pub fn apply_middleware(router: Router, service: &'static str, request_timeout: Duration) -> Router {
    router
        .route(HEALTH_PATH, get(|| async { "ok" }))
        .fallback(route_not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |req: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        service,
                        method = %req.method(),
                        uri = %req.uri().path(),
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(|res: &Response<Body>, latency: Duration, span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                }),
        )
}
