//! Process-wide `tracing` subscriber for the binaries.

use tracing_subscriber::EnvFilter;

/// Variable read before `RUST_LOG` when building the filter.
pub const LOG_ENV: &str = "KG_EXTRACT_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install a fmt subscriber on stderr, leaving stdout to program output.
///
/// Calling this more than once is harmless.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
