//! Paths and problem codes of the metadata REST API.

use marquee_transport::encode_segment;

pub const GET_ROUTE: &str = "/metadata/{id}";
pub const PUT_ROUTE: &str = "/metadata";

pub mod codes {
    pub const NOT_FOUND: &str = "METADATA_NOT_FOUND";
    pub const INVALID_ARGUMENT: &str = "METADATA_INVALID_ARGUMENT";
    pub const INTERNAL: &str = "METADATA_INTERNAL";
}

#[must_use]
pub fn metadata_path(id: &str) -> String {
    format!("/metadata/{}", encode_segment(id))
}
