//! Shared pieces of the CI reporters
//!
//! Both reporters end the same way: a short emoji-tagged string handed to the
//! CI system as a named step output. This crate owns that last hop plus the
//! small text helpers and logging setup the two binaries have in common.

pub mod output;
pub mod text;

use tracing_subscriber::EnvFilter;

pub use output::{sink_for, FileOutputSink, OutputSink, RecordingSink, StdoutOutputSink};
pub use text::{format_percent, round_percent, strip_line_breaks};

/// Marker for a passing file or a green test run
pub const PASS_MARK: &str = "\u{2705}";

/// Marker for a failing file or a red test run
pub const FAIL_MARK: &str = "\u{26d4}\u{fe0f}";

/// Marker that prefixes the coverage headline
pub const COVERAGE_MARK: &str = "\u{1f4c8}";

/// Install the fmt subscriber used by every reporter binary.
///
/// Logs go to stderr so that stdout stays reserved for step outputs when no
/// output file is configured. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
