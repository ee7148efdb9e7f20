//! Test Reporter
//!
//! Runs a test runner that writes one JSON event per line, and turns the run
//! into the `test` and `err` step outputs: a fixed success line, or a count of
//! failing tests with one collapsible entry per failure.

pub mod app;
pub mod error;
pub mod events;
pub mod failures;
pub mod pipeline;
pub mod runner;
pub mod summary;

pub use error::{ReportError, ReportResult};
pub use events::{TestEvent, TestId};
pub use failures::FailedTest;
pub use pipeline::{Outcome, ERROR_FLAG_OUTPUT, TEST_OUTPUT};
pub use runner::{RunOutput, TestCommand};
