//! Structured logging using **tracing**.
//!
//! Events go to stderr as JSON so stdout stays reserved for the summary and
//! JSON report output.

use std::path::Path;

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset or invalid. Per-file failures log at
/// warn and must stay visible.
const DEFAULT_DIRECTIVE: &str = "warn";

/// Builds the event filter from a `RUST_LOG`-style value.
fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Initializes the global tracing subscriber.
///
/// Call *once* at the beginning of the process.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=deadcss_core=debug`).
///   Defaults to `warn` when unset.
pub fn init_structured_logging() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(build_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

/// Logs a warning event.
pub fn log_warn(message: &str) {
    warn!(detail = %message);
}

/// Logs an info event.
pub fn log_info(message: &str) {
    info!(detail = %message);
}

/// Logs an error event.
pub fn log_error(message: &str) {
    error!(detail = %message);
}

/// Logs that a target file is being scanned.
pub fn log_scanning(path: &Path) {
    debug!(event = "scan", file = %path.display());
}

/// Logs a non-fatal per-file failure. The file contributes no usages.
pub fn log_file_failure(path: &Path, err: &dyn std::fmt::Display) {
    warn!(event = "scan_failed", file = %path.display(), error = %err);
}
