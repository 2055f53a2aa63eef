//! Batch ingestion of rating events.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use marquee_bootstrap::{AppConfig, RegistryBackend};
use marquee_discovery::Resolver;
use marquee_transport::HttpConnector;
use rating_sdk::{RatingEvent, RatingGateway};

/// Parse a JSON array of rating events.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a list of events.
pub fn read_events(path: &Path) -> Result<Vec<RatingEvent>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid rating events in {}", path.display()))
}

/// Send the events in `path` to a rating instance found through the
/// configured remote registry. Returns how many events were applied.
///
/// # Errors
/// Returns an error if the registry backend is not remote, the file is
/// invalid, or the rating service rejects the batch.
pub async fn ingest_file(config: &AppConfig, path: &Path) -> Result<usize> {
    if config.registry.backend != RegistryBackend::Remote {
        anyhow::bail!(
            "ingest needs the remote registry backend (set registry.backend or pass --registry)"
        );
    }
    let events = read_events(path)?;
    if events.is_empty() {
        tracing::info!("no rating events to ingest");
        return Ok(0);
    }

    let connector = Arc::new(HttpConnector::new(config.transport.clone()));
    let registry = crate::runner::registry_backend(config, connector.clone());
    let gateway = RatingGateway::new(Resolver::new(registry, connector));
    let applied = gateway
        .apply_events(&events)
        .await
        .context("rating service rejected the events")?;
    tracing::info!(applied, "rating events ingested");
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rating_sdk::RatingEventType;

    #[test]
    fn events_are_read_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratings.json");
        std::fs::write(
            &path,
            r#"[
                {"user_id": "u1", "record_id": "m1", "record_type": "movie", "value": 5, "event_type": "put"},
                {"user_id": "u2", "record_id": "m1", "record_type": "movie", "event_type": "delete"}
            ]"#,
        )
        .unwrap();

        let events = read_events(&path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].value, 5);
        assert_eq!(events[1].event_type, RatingEventType::Delete);
        assert_eq!(events[1].value, 0);
    }

    #[test]
    fn unknown_record_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratings.json");
        std::fs::write(
            &path,
            r#"[{"user_id": "u1", "record_id": "b1", "record_type": "book", "value": 5, "event_type": "put"}]"#,
        )
        .unwrap();
        let err = read_events(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid rating events"));
    }

    #[tokio::test]
    async fn in_memory_backend_is_refused() {
        let mut config = AppConfig::default();
        config.registry.backend = RegistryBackend::InMemory;
        let err = ingest_file(&config, Path::new("unused.json")).await.unwrap_err();
        assert!(err.to_string().contains("remote registry"));
    }
}
