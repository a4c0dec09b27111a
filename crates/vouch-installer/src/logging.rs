use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Installs the JSON subscriber on stderr.
///
/// Quiet mode turns every level off so stdout and stderr only carry
/// user-facing output. Otherwise `RUST_LOG` is honoured, defaulting to `info`.
pub fn init_logging(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false);

    // A subscriber may already be set when embedded in tests.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
