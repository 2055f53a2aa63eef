use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use marquee_bootstrap::{AppConfig, RateLimitConfig, RegistryBackend};
use marquee_discovery::{InMemoryRegistry, Registry, RemoteRegistry, Resolver, ServiceInstance};
use marquee_http::{HttpServer, apply_middleware};
use marquee_transport::{Connector, HttpConnector};
use metadata::{InMemoryMetadataRepository, MetadataService};
use metadata_sdk::MetadataGateway;
use movie::{AdmissionLimiter, MovieController};
use rating::{InMemoryRatingRepository, RatingService};
use rating_sdk::RatingGateway;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A service this binary can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Registry,
    Metadata,
    Rating,
    Movie,
}

impl Role {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Registry => registry::SERVICE_NAME,
            Self::Metadata => metadata_sdk::SERVICE_NAME,
            Self::Rating => rating_sdk::SERVICE_NAME,
            Self::Movie => movie::SERVICE_NAME,
        }
    }

    #[must_use]
    pub fn port(self, config: &AppConfig) -> u16 {
        let ports = &config.server.ports;
        match self {
            Self::Registry => ports.registry,
            Self::Metadata => ports.metadata,
            Self::Rating => ports.rating,
            Self::Movie => ports.movie,
        }
    }

    pub fn set_port(self, config: &mut AppConfig, port: u16) {
        let ports = &mut config.server.ports;
        match self {
            Self::Registry => ports.registry = port,
            Self::Metadata => ports.metadata = port,
            Self::Rating => ports.rating = port,
            Self::Movie => ports.movie = port,
        }
    }
}

/// An HTTP server plus, for discoverable services, its registration.
#[derive(Debug)]
pub struct RunningService {
    server: HttpServer,
    instance: Option<ServiceInstance>,
}

impl RunningService {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.server.name()
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    #[must_use]
    pub fn instance(&self) -> Option<&ServiceInstance> {
        self.instance.as_ref()
    }

    /// Leave discovery first so no new traffic is routed here, then drain.
    ///
    /// # Errors
    /// Returns an error if the server does not drain within `drain_timeout`.
    pub async fn stop(self, drain_timeout: Duration) -> Result<()> {
        let name = self.name();
        if let Some(instance) = self.instance
            && let Err(e) = instance.stop().await
        {
            tracing::warn!(service = name, error = %e, "deregistration failed");
        }
        self.server
            .stop(drain_timeout)
            .await
            .with_context(|| format!("failed to stop {name} server"))
    }
}

/// Every service started by one command, stopped in reverse start order.
#[derive(Debug)]
pub struct Deployment {
    services: Vec<RunningService>,
    tasks: Vec<JoinHandle<()>>,
    tasks_cancel: CancellationToken,
    drain_timeout: Duration,
}

impl Deployment {
    fn new(config: &AppConfig) -> Self {
        Self {
            services: Vec::new(),
            tasks: Vec::new(),
            tasks_cancel: CancellationToken::new(),
            drain_timeout: config.server.shutdown_timeout,
        }
    }

    #[must_use]
    pub fn service(&self, name: &str) -> Option<&RunningService> {
        self.services.iter().find(|s| s.name() == name)
    }

    #[must_use]
    pub fn services(&self) -> &[RunningService] {
        &self.services
    }

    /// Wait for `shutdown`, then stop everything.
    ///
    /// # Errors
    /// See [`Deployment::stop`].
    pub async fn run_until(self, shutdown: &CancellationToken) -> Result<()> {
        shutdown.cancelled().await;
        self.stop().await
    }

    /// Stop all services and background tasks. Every service is stopped even
    /// if an earlier one fails; the first failure is returned.
    ///
    /// # Errors
    /// Returns the first service stop failure.
    pub async fn stop(self) -> Result<()> {
        let mut first_error = None;
        for service in self.services.into_iter().rev() {
            if let Err(e) = service.stop(self.drain_timeout).await {
                tracing::error!(error = %e, "service stop failed");
                first_error.get_or_insert(e);
            }
        }
        self.tasks_cancel.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "background task ended abnormally");
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn launch(
        &mut self,
        role: Role,
        router: Router,
        config: &AppConfig,
        registry: Option<Arc<dyn Registry>>,
    ) -> Result<()> {
        let name = role.name();
        let addr = config.server.bind_addr(role.port(config));
        let router = apply_middleware(router, name, config.server.request_timeout);
        let server = HttpServer::start(name, &addr, router, CancellationToken::new())
            .await
            .with_context(|| format!("failed to start {name} server"))?;

        let instance = match registry {
            Some(registry) => {
                let advertised = format!(
                    "{}:{}",
                    config.server.advertise_host(),
                    server.local_addr().port()
                );
                match ServiceInstance::start(
                    registry,
                    name,
                    &advertised,
                    config.registry.heartbeat_interval,
                    &self.tasks_cancel,
                )
                .await
                {
                    Ok(instance) => Some(instance),
                    Err(e) => {
                        // not tracked yet, stop it here
                        if let Err(stop_err) = server.stop(self.drain_timeout).await {
                            tracing::warn!(service = name, error = %stop_err, "server stop failed");
                        }
                        return Err(e).with_context(|| format!("failed to register {name}"));
                    }
                }
            }
            None => None,
        };

        self.services.push(RunningService { server, instance });
        Ok(())
    }

    fn spawn_compaction(&mut self, store: &Arc<InMemoryRegistry>, config: &AppConfig) {
        if let Some(interval) = config.registry.compaction_interval {
            tracing::info!(?interval, "registry compaction enabled");
            self.tasks.push(registry::spawn_compaction(
                store.clone(),
                interval,
                self.tasks_cancel.child_token(),
            ));
        }
    }
}

/// Registry the discoverable services of a standalone process use.
#[must_use]
pub fn registry_backend(config: &AppConfig, connector: Arc<dyn Connector>) -> Arc<dyn Registry> {
    match config.registry.backend {
        RegistryBackend::Remote => {
            tracing::info!(address = %config.registry.address, "using remote registry");
            Arc::new(RemoteRegistry::new(config.registry.address.clone(), connector))
        }
        RegistryBackend::InMemory => {
            tracing::warn!("in-memory registry is private to this process");
            Arc::new(InMemoryRegistry::with_liveness_window(
                config.registry.liveness_window,
            ))
        }
    }
}

fn metadata_router() -> Router {
    let service = MetadataService::new(Arc::new(InMemoryMetadataRepository::new()));
    metadata::router(Arc::new(service))
}

fn rating_router() -> Router {
    let service = RatingService::new(Arc::new(InMemoryRatingRepository::new()));
    rating::router(Arc::new(service))
}

fn movie_router(resolver: &Resolver, rate_limit: &RateLimitConfig) -> Result<Router> {
    let controller = MovieController::new(
        Arc::new(MetadataGateway::new(resolver.clone())),
        Arc::new(RatingGateway::new(resolver.clone())),
    );
    let limiter = AdmissionLimiter::new(rate_limit.rps, rate_limit.burst)
        .context("invalid rate limit")?;
    Ok(movie::router(Arc::new(controller), Arc::new(limiter)))
}

fn connector(config: &AppConfig) -> Arc<dyn Connector> {
    Arc::new(HttpConnector::new(config.transport.clone()))
}

async fn start_role(
    deployment: &mut Deployment,
    role: Role,
    config: &AppConfig,
    registry: &Arc<dyn Registry>,
    connector: &Arc<dyn Connector>,
) -> Result<()> {
    let router = match role {
        Role::Metadata => metadata_router(),
        Role::Rating => rating_router(),
        Role::Movie => movie_router(
            &Resolver::new(registry.clone(), connector.clone()),
            &config.rate_limit,
        )?,
        Role::Registry => anyhow::bail!("the registry service is not discoverable"),
    };
    deployment
        .launch(role, router, config, Some(registry.clone()))
        .await
}

async fn start_registry(
    deployment: &mut Deployment,
    store: &Arc<InMemoryRegistry>,
    config: &AppConfig,
) -> Result<()> {
    deployment
        .launch(Role::Registry, registry::router(store.clone()), config, None)
        .await?;
    deployment.spawn_compaction(store, config);
    Ok(())
}

/// Start one service in this process.
///
/// # Errors
/// Returns an error if the server cannot bind or the instance cannot
/// register.
pub async fn start_single(role: Role, config: &AppConfig) -> Result<Deployment> {
    let mut deployment = Deployment::new(config);
    let result = if role == Role::Registry {
        let store = Arc::new(InMemoryRegistry::with_liveness_window(
            config.registry.liveness_window,
        ));
        start_registry(&mut deployment, &store, config).await
    } else {
        let connector = connector(config);
        let registry = registry_backend(config, connector.clone());
        start_role(&mut deployment, role, config, &registry, &connector).await
    };
    match result {
        Ok(()) => Ok(deployment),
        Err(e) => Err(abort(deployment, e).await),
    }
}

/// Start every service in this process around one shared in-memory
/// registry, which is also served over HTTP for out-of-process clients.
///
/// # Errors
/// Returns an error if any server cannot bind; services already started are
/// stopped again.
pub async fn start_all(config: &AppConfig) -> Result<Deployment> {
    let mut deployment = Deployment::new(config);
    let store = Arc::new(InMemoryRegistry::with_liveness_window(
        config.registry.liveness_window,
    ));
    let registry: Arc<dyn Registry> = store.clone();
    let connector = connector(config);

    if let Err(e) = start_registry(&mut deployment, &store, config).await {
        return Err(abort(deployment, e).await);
    }
    for role in [Role::Metadata, Role::Rating, Role::Movie] {
        if let Err(e) = start_role(&mut deployment, role, config, &registry, &connector).await {
            return Err(abort(deployment, e).await);
        }
    }
    Ok(deployment)
}

async fn abort(deployment: Deployment, err: anyhow::Error) -> anyhow::Error {
    if let Err(stop_err) = deployment.stop().await {
        tracing::warn!(error = %stop_err, "cleanup after failed start failed");
    }
    err
}
