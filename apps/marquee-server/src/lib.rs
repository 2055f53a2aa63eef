//! Wiring of the marquee services into one binary.
//!
//! [`runner`] starts services as HTTP servers registered with discovery,
//! [`ingest`] pushes a batch of rating events to the rating service.

pub mod ingest;
pub mod runner;

pub use runner::{Deployment, Role, RunningService};
