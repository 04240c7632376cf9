//! Tracing/logging initialization.
//!
//! Structured JSON logs so tenant ids, correlation ids, and audit actions
//! recorded as span fields survive into the log pipeline intact.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process, filtered via `RUST_LOG`.
///
/// Safe to call multiple times (subsequent calls are no-ops), so tests and
/// embedding services can both call it unconditionally.
pub fn init() {
    init_with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );
}

/// Initialize with an explicit filter, for services that configure their own
/// verbosity.
pub fn init_with_filter(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
