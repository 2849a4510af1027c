#![forbid(unsafe_code)]

use tracing_subscriber::{EnvFilter, fmt};

/// Install the stderr subscriber.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` applies, defaulting to
/// `warn`. A second call is a no-op.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
