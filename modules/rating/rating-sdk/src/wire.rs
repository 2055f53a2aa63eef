//! Paths, bodies and problem codes of the rating REST API.

use marquee_transport::encode_segment;
use serde::{Deserialize, Serialize};

use crate::{RatingValue, RecordId, RecordType, UserId};

pub const RECORD_ROUTE: &str = "/rating/{record_type}/{record_id}";
pub const EVENTS_ROUTE: &str = "/rating/events";

pub mod codes {
    pub const NOT_FOUND: &str = "RATING_NOT_FOUND";
    pub const INVALID_ARGUMENT: &str = "RATING_INVALID_ARGUMENT";
    pub const INTERNAL: &str = "RATING_INTERNAL";
}

#[must_use]
pub fn record_path(record_id: &RecordId, record_type: RecordType) -> String {
    format!("/rating/{record_type}/{}", encode_segment(record_id.as_str()))
}

/// Body of `PUT /rating/{record_type}/{record_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutRatingRequest {
    pub user_id: UserId,
    pub value: RatingValue,
}

/// Answer of `GET /rating/{record_type}/{record_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRating {
    pub record_id: RecordId,
    pub record_type: RecordType,
    pub rating: f64,
    /// Number of ratings the mean was computed over.
    pub count: usize,
}

/// Answer of `POST /rating/events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsApplied {
    pub applied: usize,
}
