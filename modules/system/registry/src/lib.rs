//! Registry service.
//!
//! Exposes an [`InMemoryRegistry`] over HTTP so that services in separate
//! processes can find each other through `marquee_discovery::RemoteRegistry`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod compaction;

pub use api::rest::routes::router;
pub use compaction::spawn_compaction;
pub use marquee_discovery::InMemoryRegistry;

/// Name the registry service logs and serves under.
pub const SERVICE_NAME: &str = "registry";
