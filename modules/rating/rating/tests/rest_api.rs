#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, get, json_request, send};

#[tokio::test]
async fn ratings_are_aggregated_per_record() {
    let app = app();
    for (user, value) in [("u1", 5), ("u2", 3), ("u3", 4)] {
        let (status, _) = send(
            &app,
            json_request("PUT", "/rating/movie/m1", &json!({"user_id": user, "value": value})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (status, body) = send(&app, get("/rating/movie/m1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 4.0);
    assert_eq!(body["count"], 3);
    assert_eq!(body["record_type"], "movie");
}

#[tokio::test]
async fn unrated_record_is_a_not_found_problem() {
    let (status, body) = send(&app(), get("/rating/movie/m1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RATING_NOT_FOUND");
}

#[tokio::test]
async fn unknown_record_type_is_rejected() {
    let (status, body) = send(&app(), get("/rating/series/s1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "RATING_INVALID_ARGUMENT");
}

#[tokio::test]
async fn events_batch_is_applied() {
    let app = app();
    let events = json!([
        {"user_id": "u1", "record_id": "m1", "record_type": "movie", "value": 2, "event_type": "put"},
        {"user_id": "u2", "record_id": "m1", "record_type": "movie", "value": 4, "event_type": "put"},
        {"user_id": "u1", "record_id": "m1", "record_type": "movie", "event_type": "delete"}
    ]);
    let (status, body) = send(&app, json_request("POST", "/rating/events", &events)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"], 3);

    let (_, body) = send(&app, get("/rating/movie/m1")).await;
    assert_eq!(body["rating"], 4.0);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn event_with_unknown_record_type_is_rejected() {
    let events = json!([
        {"user_id": "u1", "record_id": "m1", "record_type": "book", "value": 2, "event_type": "put"}
    ]);
    let (status, body) = send(&app(), json_request("POST", "/rating/events", &events)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST_BODY");
}
