//! Movie service.
//!
//! [`MovieController`] composes the metadata and rating services into
//! [`MovieDetails`]; [`AdmissionLimiter`] rejects excess traffic before it
//! reaches the controller.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod domain;
pub mod limiter;

pub use api::rest::routes::router;
pub use domain::controller::MovieController;
pub use domain::error::ControllerError;
pub use domain::model::MovieDetails;
pub use limiter::{AdmissionLimiter, LimiterConfigError, RateLimited};

/// Name the movie service registers under.
pub const SERVICE_NAME: &str = "movie";
