//! Structured logging setup

use crate::config::Verbosity;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is absent or unparsable
#[must_use]
pub fn default_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::new(verbosity.log_directive())
}

/// Install the global subscriber on stderr.
///
/// `RUST_LOG` takes precedence over `-v` / `-q`. Calling this twice is a no-op.
pub fn init_logging(verbosity: Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbosity)),
        )
        .with_writer(std::io::stderr)
        .with_target(verbosity.is_debug())
        .try_init();
}
