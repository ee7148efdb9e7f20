use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use report_core::sink_for;

use crate::pipeline::{self, Outcome};
use crate::summary::DEFAULT_PASS_THRESHOLD;

pub const DEFAULT_LCOV_PATH: &str = "coverage/lcov.info";
pub const DEFAULT_PREVIOUS_CACHE: &str = "coverage-cache/coverage.json";
pub const DEFAULT_CACHE_OUT: &str = "coverage/coverage.json";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "coverage-reporter",
    author,
    version,
    about = "Summarize an LCOV report as a CI step output",
    long_about = None
)]
pub struct Args {
    /// LCOV tracefile to summarize
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LCOV_PATH)]
    pub lcov: PathBuf,

    /// Cache restored from the previous run
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PREVIOUS_CACHE)]
    pub previous_cache: PathBuf,

    /// Where this run's cache entry is written
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CACHE_OUT)]
    pub cache_out: PathBuf,

    /// Files strictly above this percentage are marked passing
    #[arg(long, default_value_t = DEFAULT_PASS_THRESHOLD)]
    pub pass_threshold: f64,

    /// Step output file; outputs are printed to stdout when unset
    #[arg(long, value_name = "PATH", env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageConfig {
    pub lcov_path: PathBuf,
    pub previous_cache: PathBuf,
    pub cache_out: PathBuf,
    pub pass_threshold: f64,
    pub output_file: Option<PathBuf>,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            lcov_path: PathBuf::from(DEFAULT_LCOV_PATH),
            previous_cache: PathBuf::from(DEFAULT_PREVIOUS_CACHE),
            cache_out: PathBuf::from(DEFAULT_CACHE_OUT),
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            output_file: None,
        }
    }
}

impl From<Args> for CoverageConfig {
    fn from(value: Args) -> Self {
        Self {
            lcov_path: value.lcov,
            previous_cache: value.previous_cache,
            cache_out: value.cache_out,
            pass_threshold: value.pass_threshold,
            output_file: value.output_file.filter(|p| !p.as_os_str().is_empty()),
        }
    }
}

/// Run the reporter against the configured output sink.
///
/// An unusable report is not an error here: it is reported through the
/// `coverage` output as the failure token.
pub fn run(config: CoverageConfig) -> Result<Outcome> {
    let mut sink = sink_for(config.output_file.as_deref());
    pipeline::run(&config, sink.as_mut())
}
