//! Admission control for the movie endpoint: a token bucket refilled at
//! `rps` tokens per second holding at most `burst` tokens. A request either
//! takes a token or is rejected on the spot; nothing queues.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use marquee_errors::Problem;

pub const RATE_LIMITED_CODE: &str = "RATE_LIMITED";

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum LimiterConfigError {
    #[error("rate limit rps must be greater than 0")]
    ZeroRate,
    #[error("rate limit burst must be greater than 0")]
    ZeroBurst,
}

/// The request was rejected; a token is expected after `retry_after`.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
#[error("rate limited, retry after {retry_after:?}")]
pub struct RateLimited {
    pub retry_after: Duration,
}

type Bucket<C> = RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

pub struct AdmissionLimiter<C: Clock = DefaultClock> {
    bucket: Bucket<C>,
    rps: u32,
    burst: u32,
}

impl<C: Clock> std::fmt::Debug for AdmissionLimiter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionLimiter")
            .field("rps", &self.rps)
            .field("burst", &self.burst)
            .finish_non_exhaustive()
    }
}

impl AdmissionLimiter<DefaultClock> {
    /// # Errors
    /// [`LimiterConfigError`] if `rps` or `burst` is zero.
    pub fn new(rps: u32, burst: u32) -> Result<Self, LimiterConfigError> {
        Self::with_clock(rps, burst, DefaultClock::default())
    }
}

impl<C: Clock> AdmissionLimiter<C> {
    /// # Errors
    /// [`LimiterConfigError`] if `rps` or `burst` is zero.
    pub fn with_clock(rps: u32, burst: u32, clock: C) -> Result<Self, LimiterConfigError> {
        let rate = NonZeroU32::new(rps).ok_or(LimiterConfigError::ZeroRate)?;
        let cap = NonZeroU32::new(burst).ok_or(LimiterConfigError::ZeroBurst)?;
        let quota = Quota::per_second(rate).allow_burst(cap);
        Ok(Self {
            bucket: RateLimiter::direct_with_clock(quota, clock),
            rps,
            burst,
        })
    }

    /// Take one token.
    ///
    /// # Errors
    /// [`RateLimited`] if the bucket is empty.
    pub fn check(&self) -> Result<(), RateLimited> {
        self.bucket.check().map_err(|not_until| RateLimited {
            retry_after: not_until.wait_time_from(self.bucket.clock().now()),
        })
    }

    #[must_use]
    pub fn rps(&self) -> u32 {
        self.rps
    }

    #[must_use]
    pub fn burst(&self) -> u32 {
        self.burst
    }
}

impl IntoResponse for RateLimited {
    fn into_response(self) -> Response {
        // Whole seconds, rounded up, never 0.
        let secs = self.retry_after.as_secs()
            + u64::from(self.retry_after.subsec_nanos() > 0);
        let problem = Problem::coded(
            StatusCode::TOO_MANY_REQUESTS,
            RATE_LIMITED_CODE,
            "Too many requests",
            "request rejected by admission control",
        );
        let mut resp = problem.into_response();
        resp.headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
        resp
    }
}

/// Axum middleware rejecting requests the limiter does not admit.
pub async fn admission_control(
    State(limiter): State<Arc<AdmissionLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    match limiter.check() {
        Ok(()) => next.run(req).await,
        Err(limited) => {
            tracing::debug!(
                retry_after = ?limited.retry_after,
                path = %req.uri().path(),
                "request rejected by admission control"
            );
            limited.into_response()
        }
    }
}
