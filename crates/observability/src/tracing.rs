//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Output format of the fmt layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    /// One JSON object per line.
    Json,
    /// Human-readable multi-line output for local runs.
    Pretty,
}

/// Build the filter: `RUST_LOG` when set and valid, else `default_directive`.
pub fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(default_directive: &str, format: Format) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = match format {
        Format::Json => builder.json().try_init(),
        Format::Pretty => builder.pretty().try_init(),
    };
}
