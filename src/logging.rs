use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),
}

/// Initialise le subscriber tracing (console)
/// RUST_LOG a priorité sur le niveau passé en paramètre
pub fn init_logging(level: &str) -> Result<(), LoggingError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| LoggingError::InvalidLogLevel(format!("{}: {}", level, e)))?,
    };

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggingError::InitializationError(e.to_string()))
}
