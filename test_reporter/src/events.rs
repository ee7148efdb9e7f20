//! Test runner event stream
//!
//! The JSON reporter writes one event object per line. Only the events needed
//! to explain a failure are decoded into typed variants; everything else is
//! kept as [`TestEvent::Other`].

use std::fmt;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::{ReportError, ReportResult};

/// Identity of a test case within one run.
///
/// Runners emit numeric ids; string ids are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestId(String);

impl TestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for TestId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TestId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => TestId::from(n),
            RawId::Text(s) => TestId(s),
        })
    }
}

/// The `test` object of a `testStart` event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestDeclaration {
    pub id: TestId,
    pub name: String,
    /// Location in the suite file
    #[serde(default)]
    pub root_url: Option<String>,
    /// Location of the `test()` call, when it lives outside the suite file
    #[serde(default)]
    pub url: Option<String>,
}

impl TestDeclaration {
    /// Path of the file that declared the test
    pub fn origin(&self) -> Option<&str> {
        self.root_url
            .as_deref()
            .or(self.url.as_deref())
            .filter(|origin| !origin.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TestEvent {
    /// A test was declared and is about to run
    TestStart { test: TestDeclaration },
    /// A test finished; `result` is `success`, `failure` or `error`
    TestDone {
        #[serde(rename = "testID")]
        test_id: TestId,
        result: String,
    },
    /// Output printed while a test ran, including caught exceptions
    Print {
        #[serde(rename = "testID")]
        test_id: TestId,
        message: String,
    },
    #[serde(other)]
    Other,
}

/// Decode a captured line-delimited event stream.
///
/// Blank lines and lines that are not JSON objects are runner noise and are
/// skipped; an object line that does not decode is an error.
pub fn parse_stream(stdout: &str) -> ReportResult<Vec<TestEvent>> {
    let mut events = Vec::new();
    let mut skipped = 0usize;

    for (i, line) in stdout.lines().enumerate() {
        let line = line.trim();
        if !line.starts_with('{') {
            if !line.is_empty() {
                skipped += 1;
            }
            continue;
        }

        let event = serde_json::from_str::<TestEvent>(line).map_err(|source| {
            ReportError::Decode {
                line: i + 1,
                source,
            }
        })?;
        events.push(event);
    }

    debug!(events = events.len(), skipped, "Decoded test event stream");
    Ok(events)
}
