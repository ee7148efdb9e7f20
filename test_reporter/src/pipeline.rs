//! Execute -> parse -> correlate -> format -> emit

use anyhow::Result;
use report_core::{OutputSink, FAIL_MARK, PASS_MARK};
use tracing::{error, info};

use crate::app::TestConfig;
use crate::error::{ReportError, ReportResult};
use crate::events::{self, TestEvent};
use crate::failures::{self, FailedTest};
use crate::runner::RunOutput;
use crate::summary::{self, SUCCESS_MESSAGE};

/// Step output carrying the status line
pub const TEST_OUTPUT: &str = "test";

/// Step output set to `true` whenever the status line reports a problem
pub const ERROR_FLAG_OUTPUT: &str = "err";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(Vec<FailedTest>),
}

/// Decide what a finished run means, without emitting anything
pub fn evaluate(run: &RunOutput) -> ReportResult<Outcome> {
    if run.success {
        return Ok(Outcome::Passed);
    }
    if run.stdout.trim().is_empty() {
        return Err(ReportError::empty_output(run.code));
    }

    let events = events::parse_stream(&run.stdout)?;
    if !events
        .iter()
        .any(|event| matches!(event, TestEvent::TestDone { .. }))
    {
        return Err(ReportError::no_test_results(run.code));
    }
    let failures = failures::collect(&events)?;
    if failures.is_empty() {
        info!(code = ?run.code, "Runner failed but reported no failing tests");
        return Ok(Outcome::Passed);
    }
    Ok(Outcome::Failed(failures))
}

fn emit_error(err: &ReportError, sink: &mut dyn OutputSink) -> Result<()> {
    match std::error::Error::source(err) {
        Some(cause) => error!(error = %err, cause = %cause, "Unable to summarize test results"),
        None => error!(error = %err, "Unable to summarize test results"),
    }
    sink.set_output(TEST_OUTPUT, &summary::render_error(err))?;
    sink.set_output(ERROR_FLAG_OUTPUT, "true")?;
    Ok(())
}

/// Emit the outputs for a finished run.
///
/// When the run cannot be summarized the error status is still emitted before
/// the cause is returned.
pub fn report(run: &RunOutput, sink: &mut dyn OutputSink) -> Result<Outcome> {
    let outcome = match evaluate(run) {
        Ok(outcome) => outcome,
        Err(err) => {
            emit_error(&err, sink)?;
            return Err(err.into());
        }
    };

    match &outcome {
        Outcome::Passed => {
            sink.set_output(TEST_OUTPUT, SUCCESS_MESSAGE)?;
            info!("{}", PASS_MARK);
        }
        Outcome::Failed(failures) => {
            sink.set_output(TEST_OUTPUT, &summary::render_failures(failures))?;
            sink.set_output(ERROR_FLAG_OUTPUT, "true")?;
            info!(failed = failures.len(), "{}", FAIL_MARK);
        }
    }
    Ok(outcome)
}

/// Run the configured test command and report on it
pub fn run(config: &TestConfig, sink: &mut dyn OutputSink) -> Result<Outcome> {
    match config.command.run() {
        Ok(output) => report(&output, sink),
        Err(err) => {
            emit_error(&err, sink)?;
            Err(err.into())
        }
    }
}
