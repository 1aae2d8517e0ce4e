//! Shared tracing setup for the Equimetrics binaries.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str =
    "equimetrics=info,equimetrics_server=info,equimetrics_db=info,equimetrics_client=info";

/// Initialize tracing with stderr output.
///
/// RUST_LOG overrides the default filter; `verbose` turns everything up to
/// debug. Safe to call more than once (later calls are no-ops).
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }
    });

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init();
}
