use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialise the global `tracing` subscriber on stderr.
///
/// `log_level` is any `EnvFilter` directive ("debug", "mfreport_finance=debug", ...);
/// `RUST_LOG` wins when set. Unparseable directives fall back to `info`.
pub fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(layer).init();
}
