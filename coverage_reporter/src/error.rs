use std::{fmt, io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("coverage report not found: {0:?}")]
    ReportNotFound(PathBuf),
    #[error("malformed coverage report at line {line}: {details}")]
    Format { line: usize, details: String },
    #[error("coverage report contains no file records")]
    Empty,
    #[error("cache encode error: {0}")]
    Cache(String),
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

impl ReportError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn format(line: usize, details: impl fmt::Display) -> Self {
        Self::Format {
            line,
            details: details.to_string(),
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Cache(err.to_string())
    }
}
