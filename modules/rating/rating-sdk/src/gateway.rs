use async_trait::async_trait;
use marquee_discovery::Resolver;
use marquee_transport::{CallError, RemoteRequest, RemoteResponse};
use tracing::instrument;

use crate::wire::{self, AggregatedRating, EventsApplied, PutRatingRequest};
use crate::{Rating, RatingClient, RatingError, RatingEvent, RecordId, RecordType, SERVICE_NAME};

/// [`RatingClient`] reaching a live rating instance through discovery, one
/// connection per call.
#[derive(Debug, Clone)]
pub struct RatingGateway {
    resolver: Resolver,
}

impl RatingGateway {
    #[must_use]
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Apply a batch of rating events. Returns how many were applied.
    ///
    /// # Errors
    /// [`RatingError::InvalidArgument`] if the batch contains an invalid event
    /// (nothing is applied then), [`RatingError::Unavailable`] on any other
    /// failure.
    #[instrument(skip(self, events), fields(service = SERVICE_NAME, events = events.len()))]
    pub async fn apply_events(&self, events: &[RatingEvent]) -> Result<usize, RatingError> {
        let request = RemoteRequest::post(wire::EVENTS_ROUTE)
            .with_json(events)
            .map_err(unavailable)?;
        let response = self
            .call(request)
            .await
            .map_err(|e| rejected(&e).unwrap_or_else(|| unavailable(&e)))?;
        let applied: EventsApplied = response.json().map_err(unavailable)?;
        Ok(applied.applied)
    }

    async fn call(&self, request: RemoteRequest) -> Result<RemoteResponse, CallError> {
        let mut conn = self
            .resolver
            .connect(SERVICE_NAME)
            .await
            .map_err(|e| CallError::Transport(Box::new(e)))?;
        conn.call(request).await
    }
}

#[allow(clippy::needless_pass_by_value)] // used as a map_err adapter
fn unavailable<E: std::fmt::Display>(e: E) -> RatingError {
    RatingError::Unavailable(e.to_string())
}

fn rejected(err: &CallError) -> Option<RatingError> {
    err.problem()
        .filter(|p| p.has_code(wire::codes::INVALID_ARGUMENT))
        .map(|p| RatingError::InvalidArgument(p.detail.clone()))
}

/// A 404 means "no ratings" only when it carries the rating service's own
/// problem code; a bare or foreign 404 is an unavailable upstream.
fn map_call_error(err: &CallError, record_id: &RecordId, record_type: RecordType) -> RatingError {
    let missing = err.is_not_found()
        && err
            .problem()
            .is_some_and(|p| p.has_code(wire::codes::NOT_FOUND));
    if missing {
        return RatingError::NotFound {
            record_id: record_id.clone(),
            record_type,
        };
    }
    rejected(err).unwrap_or_else(|| unavailable(err))
}

#[async_trait]
impl RatingClient for RatingGateway {
    #[instrument(skip(self), fields(service = SERVICE_NAME))]
    async fn get_aggregated_rating(
        &self,
        record_id: &RecordId,
        record_type: RecordType,
    ) -> Result<f64, RatingError> {
        let response = self
            .call(RemoteRequest::get(wire::record_path(record_id, record_type)))
            .await
            .map_err(|e| map_call_error(&e, record_id, record_type))?;
        let body: AggregatedRating = response.json().map_err(unavailable)?;
        Ok(body.rating)
    }

    #[instrument(skip(self, rating), fields(service = SERVICE_NAME, user_id = %rating.user_id))]
    async fn put_rating(
        &self,
        record_id: &RecordId,
        record_type: RecordType,
        rating: &Rating,
    ) -> Result<(), RatingError> {
        let body = PutRatingRequest {
            user_id: rating.user_id.clone(),
            value: rating.value,
        };
        let request = RemoteRequest::put(wire::record_path(record_id, record_type))
            .with_json(&body)
            .map_err(unavailable)?;
        self.call(request)
            .await
            .map_err(|e| map_call_error(&e, record_id, record_type))?;
        Ok(())
    }
}
