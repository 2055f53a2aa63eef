#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use metadata_sdk::{Metadata, MetadataClient, MetadataError};
use movie::{AdmissionLimiter, MovieController};
use parking_lot::Mutex;
use rating_sdk::{Rating, RatingClient, RatingError, RecordId, RecordType};
use tower::ServiceExt;

/// Metadata client answering from a fixed map, or failing every call.
#[derive(Default)]
pub struct FakeMetadata {
    pub records: HashMap<String, Metadata>,
    pub down: bool,
    pub calls: AtomicUsize,
}

impl FakeMetadata {
    pub fn with(records: &[Metadata]) -> Arc<Self> {
        Arc::new(Self {
            records: records.iter().map(|m| (m.id.clone(), m.clone())).collect(),
            ..Self::default()
        })
    }

    pub fn down() -> Arc<Self> {
        Arc::new(Self {
            down: true,
            ..Self::default()
        })
    }
}

#[async_trait]
impl MetadataClient for FakeMetadata {
    async fn get(&self, id: &str) -> Result<Metadata, MetadataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down {
            return Err(MetadataError::Unavailable("connection refused".to_owned()));
        }
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(id.to_owned()))
    }

    async fn put(&self, _metadata: &Metadata) -> Result<(), MetadataError> {
        Err(MetadataError::Unavailable("read only".to_owned()))
    }
}

/// Metadata client whose lookups never complete. Records whether a lookup
/// started and whether its future was dropped.
#[derive(Default)]
pub struct HangingMetadata {
    pub started: AtomicBool,
    pub dropped: Arc<AtomicBool>,
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl MetadataClient for HangingMetadata {
    async fn get(&self, _id: &str) -> Result<Metadata, MetadataError> {
        let _guard = SetOnDrop(self.dropped.clone());
        self.started.store(true, Ordering::SeqCst);
        std::future::pending().await
    }

    async fn put(&self, _metadata: &Metadata) -> Result<(), MetadataError> {
        std::future::pending().await
    }
}

#[derive(Clone, Copy)]
pub enum RatingBehavior {
    Value(f64),
    NotFound,
    Down,
    /// Writes are refused as invalid; reads find nothing.
    Rejects,
}

pub struct FakeRating {
    pub behavior: RatingBehavior,
    pub calls: AtomicUsize,
    pub stored: Mutex<Vec<Rating>>,
}

impl FakeRating {
    pub fn new(behavior: RatingBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            stored: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RatingClient for FakeRating {
    async fn get_aggregated_rating(
        &self,
        record_id: &RecordId,
        record_type: RecordType,
    ) -> Result<f64, RatingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            RatingBehavior::Value(v) => Ok(v),
            RatingBehavior::NotFound | RatingBehavior::Rejects => Err(RatingError::NotFound {
                record_id: record_id.clone(),
                record_type,
            }),
            RatingBehavior::Down => Err(RatingError::Unavailable("timeout".to_owned())),
        }
    }

    async fn put_rating(
        &self,
        _record_id: &RecordId,
        _record_type: RecordType,
        rating: &Rating,
    ) -> Result<(), RatingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            RatingBehavior::Down => return Err(RatingError::Unavailable("timeout".to_owned())),
            RatingBehavior::Rejects => {
                return Err(RatingError::InvalidArgument("user_id must not be empty".to_owned()));
            }
            RatingBehavior::Value(_) | RatingBehavior::NotFound => {}
        }
        self.stored.lock().push(rating.clone());
        Ok(())
    }
}

pub fn the_movie() -> Metadata {
    Metadata::new("the-movie", "The Movie")
        .with_description("The Movie, the one and only")
        .with_director("Mr D.")
}

pub fn app(metadata: Arc<FakeMetadata>, rating: Arc<FakeRating>, rps: u32, burst: u32) -> Router {
    app_with(metadata, rating, rps, burst, Duration::from_secs(5))
}

pub fn app_with(
    metadata: Arc<dyn MetadataClient>,
    rating: Arc<dyn RatingClient>,
    rps: u32,
    burst: u32,
    request_timeout: Duration,
) -> Router {
    let controller = Arc::new(MovieController::new(metadata, rating));
    let limiter = Arc::new(AdmissionLimiter::new(rps, burst).unwrap());
    marquee_http::apply_middleware(movie::router(controller, limiter), "movie", request_timeout)
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, serde_json::Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}
