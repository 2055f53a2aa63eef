//! Rating SDK
//!
//! - model: [`RecordId`], [`RecordType`], [`UserId`], [`RatingValue`],
//!   [`Rating`], [`RatingEvent`]
//! - client contract: [`RatingClient`], [`RatingError`]
//! - [`RatingGateway`]: discovery-backed implementation

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

mod api;
mod gateway;
mod model;
pub mod wire;

pub use api::{RatingClient, RatingError};
pub use gateway::RatingGateway;
pub use model::{
    ParseRecordTypeError, Rating, RatingEvent, RatingEventType, RatingValue, RecordId, RecordType,
    UserId,
};

/// Name the rating service registers under.
pub const SERVICE_NAME: &str = "rating";
