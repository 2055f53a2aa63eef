use metadata_sdk::Metadata;
use serde::{Deserialize, Serialize};

/// Movie metadata together with its aggregated rating, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub metadata: Metadata,
}
