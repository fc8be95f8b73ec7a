//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// `RUST_LOG` controls filtering (default `info`). Output is JSON unless
/// `LOG_FORMAT=text` selects the compact human-readable format.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    if format.eq_ignore_ascii_case("text") {
        let _ = builder.compact().try_init();
    } else {
        let _ = builder.json().try_init();
    }
}
