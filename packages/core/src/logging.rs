use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize structured logging for the booking session.
///
/// Must be called once at startup (in main.rs). Log lines go to stderr so
/// they do not interleave with the session's own output on stdout.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    info!("Logging initialized");
}
