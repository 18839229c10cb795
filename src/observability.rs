use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log to stderr so stdout stays clean for results.
///
/// `RUST_LOG` wins over the configured level when it is set and valid.
pub fn init_tracing(level: Option<&str>) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level.unwrap_or(DEFAULT_LOG_LEVEL)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
