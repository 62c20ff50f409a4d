//! Support for tracing execution of a program.

use tracing_subscriber::{
    fmt::{format::FmtSpan, Subscriber},
    prelude::*,
    EnvFilter,
};

/// The filter to use when `RUST_LOG` is not set. Our stdout is reserved for
/// command output, so we stay quiet unless something goes wrong.
const DEFAULT_FILTER: &str = "warn";

/// Set up the `tracing` library with reasonable options for a CLI tool.
pub fn initialize_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(filter)
        .finish()
        .init();
}
