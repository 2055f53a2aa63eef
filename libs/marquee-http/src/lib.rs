//! Server side of every marquee service.
//!
//! [`apply_middleware`] wraps a service router with the common stack
//! (health route, problem fallback, request timeout, tracing) and
//! [`HttpServer`] runs it until a cancellation token fires.

mod layers;
mod server;

pub use layers::{HEALTH_PATH, apply_middleware, route_not_found};
pub use server::{HttpServer, ServerError};
