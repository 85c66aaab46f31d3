//! Structured logging using **tracing**.
//!
//! The JSON subscriber writes to stderr, keeping stdout free for reports.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Call *once* at the beginning of the application's runtime.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=enumgen_core=debug`).
///   When unset, the level is `info`, or `debug` if `verbose` is true.
pub fn init_structured_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(default_filter(verbose))
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the filter: `RUST_LOG` wins, otherwise the verbosity flag decides.
fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}
