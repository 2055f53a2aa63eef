#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Whole deployment in one process: every service on an ephemeral port,
//! traffic routed through the shared registry.

use std::path::Path;
use std::time::Duration;

use marquee_bootstrap::{AppConfig, RegistryBackend};
use marquee_server::ingest::ingest_file;
use marquee_server::runner::{self, Deployment};
use marquee_transport::{CallError, Connector, HttpConnector, RemoteRequest};
use metadata_sdk::Metadata;
use movie::MovieDetails;

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.ports.registry = 0;
    config.server.ports.metadata = 0;
    config.server.ports.rating = 0;
    config.server.ports.movie = 0;
    config.server.shutdown_timeout = Duration::from_secs(2);
    config.registry.heartbeat_interval = Duration::from_millis(100);
    config
}

fn address(deployment: &Deployment, service: &str) -> String {
    deployment.service(service).unwrap().local_addr().to_string()
}

async fn call(address: &str, request: RemoteRequest) -> Result<Vec<u8>, CallError> {
    let mut conn = HttpConnector::default().connect(address).await?;
    conn.call(request).await.map(|r| r.body.to_vec())
}

#[tokio::test]
async fn movie_details_are_assembled_across_services() {
    let config = config();
    let deployment = runner::start_all(&config).await.unwrap();
    assert_eq!(deployment.services().len(), 4);

    let movie = address(&deployment, "movie");
    let err = call(&movie, RemoteRequest::get("/movie/the-movie")).await.unwrap_err();
    assert!(err.is_not_found(), "{err:?}");

    let metadata = Metadata::new("the-movie", "The Movie").with_director("Mr D.");
    call(
        &address(&deployment, "metadata"),
        RemoteRequest::put("/metadata").with_json(&metadata).unwrap(),
    )
    .await
    .unwrap();

    let body = call(&movie, RemoteRequest::get("/movie/the-movie")).await.unwrap();
    let details: MovieDetails = serde_json::from_slice(&body).unwrap();
    assert_eq!(details.metadata, metadata);
    assert_eq!(details.rating, None);

    let mut ingest_config = config.clone();
    ingest_config.registry.backend = RegistryBackend::Remote;
    ingest_config.registry.address = address(&deployment, "registry");
    let events = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/ratings.json");
    assert_eq!(ingest_file(&ingest_config, &events).await.unwrap(), 5);

    let body = call(&movie, RemoteRequest::get("/movie/the-movie")).await.unwrap();
    let details: MovieDetails = serde_json::from_slice(&body).unwrap();
    assert_eq!(details.rating, Some(4.5));

    deployment.stop().await.unwrap();
}

#[tokio::test]
async fn stopped_services_leave_discovery() {
    let config = config();
    let deployment = runner::start_all(&config).await.unwrap();
    let registry = address(&deployment, "registry");
    let path = "/registry/services/rating/addresses";

    let body = call(&registry, RemoteRequest::get(path)).await.unwrap();
    let listed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let rating_instance = deployment.service("rating").unwrap().instance().unwrap();
    assert_eq!(
        listed["addresses"][0],
        rating_instance.info().address.as_str()
    );

    deployment.stop().await.unwrap();
    assert!(call(&registry, RemoteRequest::get(path)).await.is_err());
}
