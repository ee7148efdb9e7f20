//! Coverage summary rendering
//!
//! Produces the collapsible HTML table posted as the `coverage` step output.

use std::fmt;

use report_core::{format_percent, strip_line_breaks, COVERAGE_MARK, FAIL_MARK, PASS_MARK};

use crate::lcov::CoverageReport;

/// Output emitted in place of a summary when the report is unusable
pub const FAILURE_TOKEN: &str = "Fail";

/// Files strictly above this percentage get the pass marker
pub const DEFAULT_PASS_THRESHOLD: f64 = 96.0;

/// Direction of the aggregate against the previous run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delta {
    Up { from: f64 },
    Down { from: f64 },
    Unchanged,
}

impl Delta {
    /// `None` when there is no previous value to compare against.
    ///
    /// The previous value is rounded to the one decimal it is rendered with
    /// before comparing.
    pub fn between(previous: Option<f64>, current: f64) -> Option<Self> {
        let previous = (previous? * 10.0).round() / 10.0;
        let delta = if previous > current {
            Delta::Down { from: previous }
        } else if previous < current {
            Delta::Up { from: previous }
        } else {
            Delta::Unchanged
        };
        Some(delta)
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delta::Up { from } => write!(f, "up from {}", format_percent(*from)),
            Delta::Down { from } => write!(f, "down from {}", format_percent(*from)),
            Delta::Unchanged => write!(f, "no change"),
        }
    }
}

/// Render the single-line summary for `report`
pub fn render(report: &CoverageReport, delta: Option<Delta>, pass_threshold: f64) -> String {
    let mut output = format!(
        "{} - Code coverage: {}%",
        COVERAGE_MARK,
        format_percent(report.percent())
    );
    if let Some(delta) = delta {
        output.push_str(&format!(" ({})", delta));
    }

    output.push_str("<br><details><summary>See details</summary><table>");
    output.push_str("<tr><th>File Name</th><th>%</th><th>Passing?</th></tr>");
    for file in report.files() {
        let percent = file.percent();
        let mark = if percent > pass_threshold {
            PASS_MARK
        } else {
            FAIL_MARK
        };
        output.push_str(&format!(
            "<tr><td>{}</td><td>{}%</td><td>{}</td></tr>",
            file.path,
            format_percent(percent),
            mark
        ));
    }
    output.push_str("</table></details>");

    strip_line_breaks(&output)
}
