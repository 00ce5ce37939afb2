//! Tracing and logging (shared setup).

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::Format;

/// Initialize process-wide observability (tracing/logging).
///
/// `default_directive` applies when `RUST_LOG` is unset. This is safe to call
/// multiple times; subsequent calls become no-ops.
pub fn init(default_directive: &str, format: Format) {
    tracing::init(default_directive, format);
}
