//! Layered application configuration.
//!
//! Precedence, lowest first: built-in defaults, the YAML file given with
//! `--config`, environment variables prefixed with [`ENV_PREFIX`] (nested
//! keys separated by `__`, e.g. `MARQUEE__RATE_LIMIT__BURST=20`), and finally
//! command line overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use marquee_transport::TransportConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_PREFIX: &str = "MARQUEE__";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to render configuration: {0}")]
    Render(String),
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub registry: RegistryConfig,
    pub transport: TransportConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    /// Interface every service binds to.
    pub host: String,
    /// Host other services use to reach this process. Defaults to `host`.
    pub advertise_host: Option<String>,
    pub ports: PortsConfig,
    /// Upper bound on handling one inbound request, remote calls included.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// How long a stopping server waits for in-flight requests.
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            advertise_host: None,
            ports: PortsConfig::default(),
            request_timeout: Duration::from_secs(10),
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn bind_addr(&self, port: u16) -> String {
        format!("{}:{port}", self.host)
    }

    #[must_use]
    pub fn advertise_host(&self) -> &str {
        self.advertise_host.as_deref().unwrap_or(&self.host)
    }
}

/// Listening port of each service. `0` picks an ephemeral port.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct PortsConfig {
    pub registry: u16,
    pub metadata: u16,
    pub rating: u16,
    pub movie: u16,
}

impl Default for PortsConfig {
    fn default() -> Self {
        Self {
            registry: 8500,
            metadata: 8081,
            rating: 8082,
            movie: 8083,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `info,marquee_discovery=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistryBackend {
    /// Registry lives inside this process. Only useful with the `all` command.
    InMemory,
    /// Registry service reached at [`RegistryConfig::address`].
    #[default]
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct RegistryConfig {
    pub backend: RegistryBackend,
    /// `host:port` of the registry service.
    pub address: String,
    #[serde(with = "humantime_serde")]
    pub liveness_window: Duration,
    #[serde(with = "humantime_serde")]
    pub heartbeat_interval: Duration,
    /// Period of stale-record compaction in the registry service. Unset
    /// disables compaction; lookups never depend on it.
    #[serde(with = "humantime_serde")]
    pub compaction_interval: Option<Duration>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            backend: RegistryBackend::Remote,
            address: "127.0.0.1:8500".to_owned(),
            liveness_window: Duration::from_secs(5),
            heartbeat_interval: Duration::from_secs(1),
            compaction_interval: None,
        }
    }
}

/// Admission limiter in front of the movie service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct RateLimitConfig {
    /// Sustained requests per second.
    pub rps: u32,
    /// Requests accepted back to back before throttling starts.
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            rps: 100,
            burst: 100,
        }
    }
}

/// Command line values that take precedence over every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// `-v` count: 1 = info, 2 = debug, 3+ = trace.
    pub verbose: u8,
    /// Use a remote registry at this address.
    pub registry_address: Option<String>,
}

impl AppConfig {
    /// Load defaults, then `path` (if any), then the environment.
    ///
    /// # Errors
    /// - [`ConfigError::FileNotFound`] if `path` does not exist.
    /// - [`ConfigError::Load`] on malformed YAML, unknown keys or bad values.
    /// - [`ConfigError::Invalid`] if the merged values are inconsistent.
    pub fn load_layered(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let cfg: Self = figment.extract().map_err(Box::new)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        match overrides.verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
        if let Some(address) = &overrides.registry_address {
            self.registry.backend = RegistryBackend::Remote;
            self.registry.address.clone_from(address);
        }
    }

    /// Check cross-field constraints serde cannot express.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.rps == 0 {
            return Err(ConfigError::invalid("rate_limit.rps", "must be greater than 0"));
        }
        if self.rate_limit.burst == 0 {
            return Err(ConfigError::invalid("rate_limit.burst", "must be greater than 0"));
        }
        if self.registry.heartbeat_interval.is_zero() {
            return Err(ConfigError::invalid(
                "registry.heartbeat_interval",
                "must be greater than 0",
            ));
        }
        if self.registry.liveness_window <= self.registry.heartbeat_interval {
            return Err(ConfigError::invalid(
                "registry.liveness_window",
                "must be longer than registry.heartbeat_interval",
            ));
        }
        if self.registry.compaction_interval.is_some_and(|d| d.is_zero()) {
            return Err(ConfigError::invalid(
                "registry.compaction_interval",
                "must be greater than 0 when set",
            ));
        }
        if self.registry.backend == RegistryBackend::Remote && self.registry.address.is_empty() {
            return Err(ConfigError::invalid(
                "registry.address",
                "required with the remote backend",
            ));
        }
        Ok(())
    }

    /// Render the effective configuration.
    ///
    /// # Errors
    /// [`ConfigError::Render`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_saphyr::to_string(self).map_err(|e| ConfigError::Render(e.to_string()))
    }
}
