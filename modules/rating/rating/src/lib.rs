//! Rating service.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod domain;
pub mod infra;

pub use api::rest::routes::router;
pub use domain::error::DomainError;
pub use domain::repo::RatingRepository;
pub use domain::service::{Aggregate, RatingService};
pub use infra::memory::InMemoryRatingRepository;
pub use rating_sdk::SERVICE_NAME;
