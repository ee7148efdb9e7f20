use std::io;

use thiserror::Error;

use crate::events::TestId;
use crate::failures::EXCEPTION_MARKER;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("test runner {program:?} not found: {details}")]
    RunnerNotFound { program: String, details: String },
    #[error("failed to start test runner {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("test runner {status} without producing any output")]
    EmptyRunnerOutput { status: String },
    #[error("test runner {status} without reporting any finished tests")]
    NoTestResults { status: String },
    #[error("malformed test event on line {line}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("failing test {0} has no testStart event")]
    MissingDeclaration(TestId),
    #[error("failing test {0} was declared without a file location")]
    MissingOrigin(TestId),
    #[error("failing test {0} has no {marker} message", marker = EXCEPTION_MARKER)]
    MissingExceptionMessage(TestId),
}

pub type ReportResult<T> = Result<T, ReportError>;

impl ReportError {
    pub fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// `code` is `None` when the runner was killed by a signal
    pub fn empty_output(code: Option<i32>) -> Self {
        Self::EmptyRunnerOutput {
            status: exit_status(code),
        }
    }

    pub fn no_test_results(code: Option<i32>) -> Self {
        Self::NoTestResults {
            status: exit_status(code),
        }
    }
}

fn exit_status(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn report_error__empty_output_with_code__then_names_code() {
        let err = ReportError::empty_output(Some(1));
        assert_eq!(
            err.to_string(),
            "test runner exited with code 1 without producing any output"
        );
    }

    #[test]
    fn report_error__empty_output_without_code__then_names_signal() {
        let err = ReportError::empty_output(None);
        assert!(err.to_string().contains("terminated by a signal"));
    }

    #[test]
    fn report_error__no_test_results__then_names_code() {
        let err = ReportError::no_test_results(Some(1));
        assert_eq!(
            err.to_string(),
            "test runner exited with code 1 without reporting any finished tests"
        );
    }

    #[test]
    fn report_error__decode__then_message_names_line_only() {
        let source = serde_json::from_str::<serde_json::Value>("{\"type\":").unwrap_err();
        let err = ReportError::Decode { line: 3, source };

        assert_eq!(err.to_string(), "malformed test event on line 3");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn report_error__missing_message__then_names_id_and_marker() {
        let err = ReportError::MissingExceptionMessage(TestId::from("t7"));
        assert_eq!(err.to_string(), "failing test t7 has no EXCEPTION message");
    }

    #[test]
    fn report_error__spawn_constructor__then_preserves_source() {
        let err = ReportError::spawn(
            "flutter",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        match &err {
            ReportError::Spawn { program, source } => {
                assert_eq!(program, "flutter");
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        assert!(err.to_string().contains("denied"));
    }
}
