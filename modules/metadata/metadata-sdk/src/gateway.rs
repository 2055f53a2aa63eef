use async_trait::async_trait;
use marquee_discovery::Resolver;
use marquee_transport::{CallError, RemoteRequest, RemoteResponse};
use tracing::instrument;

use crate::{Metadata, MetadataClient, MetadataError, SERVICE_NAME, wire};

/// [`MetadataClient`] reaching a live metadata instance through discovery.
///
/// Each call resolves the service, opens one connection, issues one request
/// and drops the connection.
#[derive(Debug, Clone)]
pub struct MetadataGateway {
    resolver: Resolver,
}

impl MetadataGateway {
    #[must_use]
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    async fn call(&self, request: RemoteRequest, id: &str) -> Result<RemoteResponse, MetadataError> {
        let mut conn = self
            .resolver
            .connect(SERVICE_NAME)
            .await
            .map_err(|e| MetadataError::Unavailable(e.to_string()))?;
        conn.call(request).await.map_err(|e| map_call_error(&e, id))
    }
}

/// Only a 404 carrying the metadata service's own problem code means the
/// record is absent. Any other 404 comes from something that does not serve
/// the metadata API, e.g. a stale address reused by another process.
fn map_call_error(err: &CallError, id: &str) -> MetadataError {
    let missing = err.is_not_found()
        && err
            .problem()
            .is_some_and(|p| p.has_code(wire::codes::NOT_FOUND));
    if missing {
        MetadataError::NotFound(id.to_owned())
    } else {
        MetadataError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl MetadataClient for MetadataGateway {
    #[instrument(skip(self), fields(service = SERVICE_NAME))]
    async fn get(&self, id: &str) -> Result<Metadata, MetadataError> {
        let response = self
            .call(RemoteRequest::get(wire::metadata_path(id)), id)
            .await?;
        response
            .json()
            .map_err(|e| MetadataError::Unavailable(e.to_string()))
    }

    #[instrument(skip(self, metadata), fields(service = SERVICE_NAME, id = %metadata.id))]
    async fn put(&self, metadata: &Metadata) -> Result<(), MetadataError> {
        let request = RemoteRequest::put(wire::PUT_ROUTE)
            .with_json(metadata)
            .map_err(|e| MetadataError::Unavailable(e.to_string()))?;
        self.call(request, &metadata.id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_errors::Problem;

    fn not_found_with(code: &str) -> CallError {
        CallError::NotFound {
            problem: Some(Box::new(Problem::coded(
                http::StatusCode::NOT_FOUND,
                code,
                "Not found",
                "missing",
            ))),
        }
    }

    #[test]
    fn only_own_not_found_maps_to_not_found() {
        assert_eq!(
            map_call_error(&not_found_with(wire::codes::NOT_FOUND), "m1"),
            MetadataError::NotFound("m1".to_owned())
        );

        let foreign = not_found_with("ROUTE_NOT_FOUND");
        assert!(matches!(
            map_call_error(&foreign, "m1"),
            MetadataError::Unavailable(_)
        ));

        let bare = CallError::NotFound { problem: None };
        assert!(matches!(map_call_error(&bare, "m1"), MetadataError::Unavailable(_)));

        let timeout = CallError::Timeout(std::time::Duration::from_secs(1));
        assert!(matches!(
            map_call_error(&timeout, "m1"),
            MetadataError::Unavailable(_)
        ));
    }
}
