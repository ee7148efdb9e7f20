//! Test summary rendering

use report_core::{strip_line_breaks, FAIL_MARK};

use crate::error::ReportError;
use crate::failures::FailedTest;

/// Emitted when the runner reports no failing tests
pub const SUCCESS_MESSAGE: &str = "\u{2705} - All tests passed.";

fn headline(count: usize) -> String {
    if count == 1 {
        "1 test failed".to_string()
    } else {
        format!("{count} tests failed")
    }
}

fn entry(failure: &FailedTest) -> String {
    format!(
        "<details><summary>{}</br>{}</summary>`{}`</details>",
        failure.name, failure.file, failure.message
    )
}

/// Headline plus one collapsible entry per failure, on a single line
pub fn render_failures(failures: &[FailedTest]) -> String {
    let entries: String = failures.iter().map(entry).collect();
    let output = format!(
        "{} - {}</br ><details><summary>See details</summary>{}</details>",
        FAIL_MARK,
        headline(failures.len()),
        entries
    );
    strip_line_breaks(&output)
}

/// Status line for a run that could not be summarized
pub fn render_error(err: &ReportError) -> String {
    strip_line_breaks(&format!(
        "{} - Unable to summarize test results: {}",
        FAIL_MARK, err
    ))
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::events::TestId;

    fn failure(name: &str, file: &str, message: &str) -> FailedTest {
        FailedTest {
            name: name.to_string(),
            file: file.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn render_failures__one__then_singular_and_exact_entry() {
        let output = render_failures(&[failure(
            "renders widget",
            "widget_test.dart",
            "EXCEPTION: mismatch",
        )]);
        assert_eq!(
            output,
            "⛔️ - 1 test failed</br ><details><summary>See details</summary>\
             <details><summary>renders widget</br>widget_test.dart</summary>`EXCEPTION: mismatch`</details>\
             </details>"
        );
    }

    #[test]
    fn render_failures__two__then_plural_and_ordered_entries() {
        let output = render_failures(&[
            failure("a", "a_test.dart", "EXCEPTION: a"),
            failure("b", "b_test.dart", "EXCEPTION: b"),
        ]);
        assert!(output.starts_with("⛔️ - 2 tests failed</br >"));
        let a = output.find("<summary>a</br>").unwrap();
        let b = output.find("<summary>b</br>").unwrap();
        assert!(a < b);
    }

    #[test]
    fn render_failures__multiline_message__then_line_breaks_stripped() {
        let output = render_failures(&[failure(
            "x",
            "x_test.dart",
            "══╡ EXCEPTION CAUGHT ╞══\r\nExpected: true\n  Actual: false",
        )]);
        assert!(!output.contains('\n') && !output.contains('\r'));
        assert!(output.contains("`══╡ EXCEPTION CAUGHT ╞══Expected: true  Actual: false`"));
    }

    #[test]
    fn render_error__missing_declaration__then_cause_in_status() {
        let output = render_error(&ReportError::MissingDeclaration(TestId::from("4")));
        assert_eq!(
            output,
            "⛔️ - Unable to summarize test results: failing test 4 has no testStart event"
        );
    }

    #[test]
    fn render_error__malformed_event__then_no_decoder_position() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let output = render_error(&ReportError::Decode { line: 2, source });

        assert_eq!(
            output,
            "⛔️ - Unable to summarize test results: malformed test event on line 2"
        );
        assert!(!output.contains("column"));
    }

    #[test]
    fn success_message__rendered__then_fixed_text() {
        assert_eq!(SUCCESS_MESSAGE, "✅ - All tests passed.");
    }
}
