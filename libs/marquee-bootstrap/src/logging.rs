use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{LogFormat, LoggingConfig};

static INIT: Once = Once::new();

/// Install the global subscriber. Later calls are no-ops.
///
/// `RUST_LOG` takes precedence over `cfg.level` when set and valid.
pub fn init_logging(cfg: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&cfg.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let installed = match cfg.format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_current_span(true).with_span_list(false))
                .try_init(),
            LogFormat::Text => tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true))
                .try_init(),
        };

        if let Err(e) = installed {
            eprintln!("logging already initialized: {e}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        let cfg = LoggingConfig::default();
        init_logging(&cfg);
        init_logging(&LoggingConfig {
            format: LogFormat::Json,
            ..cfg
        });
        tracing::info!("logging initialized");
    }
}
