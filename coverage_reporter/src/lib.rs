//! Coverage Reporter
//!
//! Turns an LCOV tracefile into the `coverage` step output: an aggregate
//! line-coverage headline, a direction against the previous run, and a
//! collapsible per-file table.

pub mod app;
pub mod cache;
pub mod error;
pub mod lcov;
pub mod pipeline;
pub mod summary;

pub use error::{ReportError, ReportResult};
pub use lcov::{CoverageReport, FileCoverage};
pub use pipeline::{Outcome, COVERAGE_OUTPUT};
pub use summary::{Delta, FAILURE_TOKEN};
