use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use marquee_errors::Problem;
use metadata_sdk::{Metadata, wire};

use super::error::domain_error_to_problem;
use crate::domain::service::MetadataService;

/// Get the metadata of one movie
pub async fn get_metadata(
    Extension(svc): Extension<Arc<MetadataService>>,
    Path(id): Path<String>,
) -> Result<Json<Metadata>, Problem> {
    svc.get(&id)
        .await
        .map(Json)
        .map_err(|e| domain_error_to_problem(&e, &wire::metadata_path(&id)))
}

/// Store (create or replace) the metadata of one movie
pub async fn put_metadata(
    Extension(svc): Extension<Arc<MetadataService>>,
    body: Result<Json<Metadata>, JsonRejection>,
) -> Result<StatusCode, Problem> {
    let Json(metadata) = body?;
    svc.put(metadata)
        .await
        .map_err(|e| domain_error_to_problem(&e, wire::PUT_ROUTE))?;
    Ok(StatusCode::NO_CONTENT)
}
