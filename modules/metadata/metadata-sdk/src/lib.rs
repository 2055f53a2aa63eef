//! Metadata SDK
//!
//! Everything a consumer needs to talk to the metadata service:
//! - model ([`Metadata`])
//! - client contract ([`MetadataClient`]) and its error ([`MetadataError`])
//! - [`MetadataGateway`], the implementation that finds an instance
//!   through discovery for every call

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

mod api;
mod gateway;
mod model;
pub mod wire;

pub use api::{MetadataClient, MetadataError};
pub use gateway::MetadataGateway;
pub use model::Metadata;

/// Name the metadata service registers under.
pub const SERVICE_NAME: &str = "metadata";
