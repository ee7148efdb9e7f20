//! Read -> parse -> aggregate -> format -> emit -> cache

use anyhow::Result;
use report_core::{OutputSink, FAIL_MARK, PASS_MARK};
use tracing::{info, warn};

use crate::app::CoverageConfig;
use crate::cache::{self, CoverageCache};
use crate::error::ReportResult;
use crate::lcov;
use crate::summary::{self, Delta, FAILURE_TOKEN};

/// Name of the step output carrying the summary
pub const COVERAGE_OUTPUT: &str = "coverage";

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Summary emitted and cache refreshed (best-effort)
    Reported {
        percent: f64,
        delta: Option<Delta>,
    },
    /// Report missing or malformed; the failure token was emitted
    Failed,
}

struct Summary {
    text: String,
    percent: f64,
    delta: Option<Delta>,
}

fn summarize(config: &CoverageConfig) -> ReportResult<Summary> {
    let report = lcov::read(&config.lcov_path)?;
    let percent = report.percent();

    let previous = cache::load(&config.previous_cache).map(|c| c.percent);
    let delta = Delta::between(previous, percent);

    Ok(Summary {
        text: summary::render(&report, delta, config.pass_threshold),
        percent,
        delta,
    })
}

/// Run one coverage report cycle.
///
/// Only a failure to emit the output itself is returned as an error.
pub fn run(config: &CoverageConfig, sink: &mut dyn OutputSink) -> Result<Outcome> {
    let summary = match summarize(config) {
        Ok(summary) => summary,
        Err(err) => {
            warn!(
                lcov = %config.lcov_path.display(),
                error = %err,
                "Coverage report unusable"
            );
            sink.set_output(COVERAGE_OUTPUT, FAILURE_TOKEN)?;
            info!("{}", FAIL_MARK);
            return Ok(Outcome::Failed);
        }
    };

    sink.set_output(COVERAGE_OUTPUT, &summary.text)?;

    if let Err(err) = cache::store(&config.cache_out, &CoverageCache::new(summary.percent)) {
        warn!(
            cache = %config.cache_out.display(),
            error = %err,
            "Failed to write coverage cache"
        );
    }

    info!(
        percent = summary.percent,
        delta = %summary.delta.map(|d| d.to_string()).unwrap_or_default(),
        "{}",
        PASS_MARK
    );
    Ok(Outcome::Reported {
        percent: summary.percent,
        delta: summary.delta,
    })
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use report_core::RecordingSink;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    fn config_in(dir: &Path) -> CoverageConfig {
        CoverageConfig {
            lcov_path: dir.join("coverage/lcov.info"),
            previous_cache: dir.join("coverage-cache/coverage.json"),
            cache_out: dir.join("coverage/coverage.json"),
            ..CoverageConfig::default()
        }
    }

    fn workspace(lcov: Option<&str>, previous: Option<&str>) -> (TempDir, CoverageConfig) {
        let dir = tempdir().expect("tempdir");
        let config = config_in(dir.path());
        if let Some(lcov) = lcov {
            fs::create_dir_all(config.lcov_path.parent().unwrap()).unwrap();
            fs::write(&config.lcov_path, lcov).unwrap();
        }
        if let Some(previous) = previous {
            fs::create_dir_all(config.previous_cache.parent().unwrap()).unwrap();
            fs::write(&config.previous_cache, previous).unwrap();
        }
        (dir, config)
    }

    const EIGHTY_FIVE: &str = "SF:lib/a.dart\nLF:20\nLH:17\nend_of_record\n";

    #[test]
    fn run__previous_lower__then_up_annotation_and_cache_written() {
        let (_dir, config) = workspace(Some(EIGHTY_FIVE), Some("{\"percent\": 80.0}"));
        let mut sink = RecordingSink::new();

        let outcome = run(&config, &mut sink).unwrap();

        assert_eq!(
            outcome,
            Outcome::Reported {
                percent: 85.0,
                delta: Some(Delta::Up { from: 80.0 }),
            }
        );
        let text = sink.get(COVERAGE_OUTPUT).unwrap();
        assert!(text.starts_with("📈 - Code coverage: 85% (up from 80)"));
        assert_eq!(cache::load(&config.cache_out), Some(CoverageCache::new(85.0)));
    }

    #[test]
    fn run__previous_higher__then_down_annotation() {
        let (_dir, config) = workspace(Some(EIGHTY_FIVE), Some("{\"percent\": 90.0}"));
        let mut sink = RecordingSink::new();
        run(&config, &mut sink).unwrap();
        assert!(sink
            .get(COVERAGE_OUTPUT)
            .unwrap()
            .contains("85% (down from 90)"));
    }

    #[test]
    fn run__previous_equal__then_no_change() {
        let (_dir, config) = workspace(Some(EIGHTY_FIVE), Some("{\"percent\": 85.0}"));
        let mut sink = RecordingSink::new();
        run(&config, &mut sink).unwrap();
        assert!(sink.get(COVERAGE_OUTPUT).unwrap().contains("85% (no change)"));
    }

    #[test]
    fn run__no_cache__then_no_parenthetical() {
        let (_dir, config) = workspace(Some(EIGHTY_FIVE), None);
        let mut sink = RecordingSink::new();
        run(&config, &mut sink).unwrap();
        let text = sink.get(COVERAGE_OUTPUT).unwrap();
        assert!(text.starts_with("📈 - Code coverage: 85%<br>"));
        assert!(!text.contains('('));
    }

    #[test]
    fn run__corrupt_cache__then_treated_as_absent() {
        let (_dir, config) = workspace(Some(EIGHTY_FIVE), Some("not json"));
        let mut sink = RecordingSink::new();
        let outcome = run(&config, &mut sink).unwrap();
        assert_eq!(
            outcome,
            Outcome::Reported {
                percent: 85.0,
                delta: None,
            }
        );
    }

    #[test]
    fn run__missing_report__then_fail_token_and_no_cache_write() {
        let (_dir, config) = workspace(None, Some("{\"percent\": 80.0}"));
        let mut sink = RecordingSink::new();

        let outcome = run(&config, &mut sink).unwrap();

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(sink.get(COVERAGE_OUTPUT), Some("Fail"));
        assert!(!config.cache_out.exists());
    }

    #[test]
    fn run__malformed_report__then_fail_token_and_no_cache_write() {
        let (_dir, config) = workspace(Some("SF:lib/a.dart\nLF:twenty\n"), None);
        let mut sink = RecordingSink::new();

        assert_eq!(run(&config, &mut sink).unwrap(), Outcome::Failed);
        assert_eq!(sink.get(COVERAGE_OUTPUT), Some("Fail"));
        assert!(!config.cache_out.exists());
    }

    #[test]
    fn run__cache_unwritable__then_summary_still_emitted() {
        let (dir, mut config) = workspace(Some(EIGHTY_FIVE), None);
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        config.cache_out = blocker.join("coverage.json");
        let mut sink = RecordingSink::new();

        let outcome = run(&config, &mut sink).unwrap();

        assert!(matches!(outcome, Outcome::Reported { .. }));
        assert!(sink.get(COVERAGE_OUTPUT).unwrap().contains("85%"));
    }
}
