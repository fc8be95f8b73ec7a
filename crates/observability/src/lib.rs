//! Shared observability setup (tracing and logging).

/// Tracing configuration (filters, formats).
pub mod tracing;

/// Initialize process-wide observability.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
