//! Metadata service.
//!
//! Layers: `domain` (service and repository contract), `infra` (in-memory
//! repository), `api::rest` (axum routes and error mapping).

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod domain;
pub mod infra;

pub use api::rest::routes::router;
pub use domain::error::DomainError;
pub use domain::repo::MetadataRepository;
pub use domain::service::MetadataService;
pub use infra::memory::InMemoryMetadataRepository;
pub use metadata_sdk::SERVICE_NAME;
