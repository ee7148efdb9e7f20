//! Failure correlation
//!
//! A failure is a `testDone` event with an `error` result. Its name and file
//! come from the matching `testStart` event and its body from the first
//! `print` event for the same id that carries an exception dump.

use std::collections::HashMap;

use crate::error::{ReportError, ReportResult};
use crate::events::{TestDeclaration, TestEvent, TestId};

/// Token identifying a printed exception payload
pub const EXCEPTION_MARKER: &str = "EXCEPTION";

/// Path segment after which the displayed file name starts
pub const TEST_DIR_MARKER: &str = "/test/";

/// One failing test, ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTest {
    pub name: String,
    pub file: String,
    pub message: String,
}

/// Ids of tests finished with an `error` result, one per finish event, in finish order
pub fn failing_ids(events: &[TestEvent]) -> Vec<&TestId> {
    events
        .iter()
        .filter_map(|event| match event {
            TestEvent::TestDone { test_id, result } if result.eq_ignore_ascii_case("error") => {
                Some(test_id)
            }
            _ => None,
        })
        .collect()
}

/// Strip everything up to and including the last `/test/` segment
pub fn display_file_name(origin: &str) -> &str {
    origin.rsplit(TEST_DIR_MARKER).next().unwrap_or(origin)
}

/// Join every failing id with its declaration and exception message
pub fn collect(events: &[TestEvent]) -> ReportResult<Vec<FailedTest>> {
    let mut declarations: HashMap<&TestId, &TestDeclaration> = HashMap::new();
    let mut messages: HashMap<&TestId, &str> = HashMap::new();

    for event in events {
        match event {
            TestEvent::TestStart { test } => {
                declarations.entry(&test.id).or_insert(test);
            }
            TestEvent::Print { test_id, message } if message.contains(EXCEPTION_MARKER) => {
                messages.entry(test_id).or_insert(message.as_str());
            }
            _ => {}
        }
    }

    failing_ids(events)
        .into_iter()
        .map(|id| -> ReportResult<FailedTest> {
            let declaration = declarations
                .get(id)
                .ok_or_else(|| ReportError::MissingDeclaration(id.clone()))?;
            let origin = declaration
                .origin()
                .ok_or_else(|| ReportError::MissingOrigin(id.clone()))?;
            let message = messages
                .get(id)
                .ok_or_else(|| ReportError::MissingExceptionMessage(id.clone()))?;

            Ok(FailedTest {
                name: declaration.name.clone(),
                file: display_file_name(origin).to_string(),
                message: message.to_string(),
            })
        })
        .collect()
}
