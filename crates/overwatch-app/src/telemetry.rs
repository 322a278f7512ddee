//! Log subscriber setup for the binary.

/// Install the global subscriber. Filter comes from `LOG_LEVEL`
/// (EnvFilter syntax), defaulting to `info`. Logs go to stderr so stdout
/// stays clean for the run summary. Calling twice is harmless.
pub fn init_telemetry() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
