// ==========================================
// Exam Center - Logging setup
// ==========================================
// tracing + tracing-subscriber, level taken from RUST_LOG
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
///
/// # Environment
/// - RUST_LOG: filter (default: info),
///   e.g. RUST_LOG=debug or RUST_LOG=exam_center=trace
/// - EXAM_CENTER_LOG_FORMAT=json: one JSON object per line
///
/// # Example
/// ```no_run
/// use exam_center::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("EXAM_CENTER_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // stderr keeps stdout free for command output
    if json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Test subscriber, debug level, captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
