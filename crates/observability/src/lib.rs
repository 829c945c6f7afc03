//! Tracing/logging setup shared by binaries and tests.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Like [`init`], but routes output through the test harness so it only
/// shows up for failing tests.
pub fn init_for_tests() {
    tracing::install(&tracing::LogConfig::from_env().with_capture(true));
}

/// Subscriber installation.
pub mod tracing;
