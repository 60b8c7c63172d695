use dnsleak_domain::config::{LogFormat, LoggingConfig};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(cfg: &LoggingConfig) {
    let mut fell_back = false;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(cfg.level.trim()))
        .unwrap_or_else(|_| {
            fell_back = true;
            EnvFilter::new("info")
        });

    match cfg.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
    }

    if fell_back {
        warn!(level = %cfg.level, "Unusable log level, falling back to info");
    }
}
