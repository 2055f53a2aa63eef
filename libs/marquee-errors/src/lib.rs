//! Error payloads exchanged between the marquee services.
//!
//! Every service answers failures with an RFC 9457 Problem Details body. The
//! server side builds a [`Problem`] from its domain error, the client side
//! (the transport) parses it back so gateways can tell a missing entity from
//! any other remote failure.

pub mod problem;

pub use problem::{APPLICATION_PROBLEM_JSON, Problem};

/// Attach the request path and an optional trace id to a problem.
pub fn finalize(mut p: Problem, instance: &str, trace_id: Option<String>) -> Problem {
    p = p.with_instance(instance);
    if let Some(tid) = trace_id {
        p = p.with_trace_id(tid);
    }
    p
}
