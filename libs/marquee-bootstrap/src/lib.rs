//! Process bootstrap shared by the marquee binaries: layered configuration,
//! logging initialization and shutdown signals.

pub mod config;
pub mod logging;
pub mod signals;

pub use config::{
    AppConfig, CliOverrides, ConfigError, ENV_PREFIX, LogFormat, LoggingConfig, PortsConfig,
    RateLimitConfig, RegistryBackend, RegistryConfig, ServerConfig,
};
pub use logging::init_logging;
pub use signals::{shutdown_on_signal, wait_for_shutdown};
