use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use report_core::sink_for;

use crate::pipeline::{self, Outcome};
use crate::runner::{TestCommand, DEFAULT_ARGS, DEFAULT_PROGRAM};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "test-reporter",
    author,
    version,
    about = "Run tests with a JSON reporter and summarize failures as CI step outputs",
    long_about = None
)]
pub struct Args {
    /// Test runner executable
    #[arg(long, default_value = DEFAULT_PROGRAM)]
    pub program: String,

    /// Directory the runner is started in
    #[arg(long, value_name = "PATH")]
    pub workdir: Option<PathBuf>,

    /// Step output file; outputs are printed to stdout when unset
    #[arg(long, value_name = "PATH", env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Runner arguments (default: test --coverage --reporter json)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub runner_args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TestConfig {
    pub command: TestCommand,
    pub output_file: Option<PathBuf>,
}

impl From<Args> for TestConfig {
    fn from(value: Args) -> Self {
        let command = if value.runner_args.is_empty() {
            TestCommand::new(value.program, DEFAULT_ARGS)
        } else {
            TestCommand::new(value.program, value.runner_args)
        };
        let command = match value.workdir {
            Some(dir) => command.workdir(dir),
            None => command,
        };

        Self {
            command,
            output_file: value.output_file.filter(|p| !p.as_os_str().is_empty()),
        }
    }
}

pub fn run(config: TestConfig) -> Result<Outcome> {
    let mut sink = sink_for(config.output_file.as_deref());
    pipeline::run(&config, sink.as_mut())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn args__no_flags__then_flutter_defaults() {
        let config = TestConfig::from(Args::try_parse_from(["test-reporter"]).unwrap());
        assert_eq!(config.command, TestCommand::default());
    }

    #[test]
    fn args__trailing_runner_args__then_passed_verbatim() {
        let args = Args::try_parse_from([
            "test-reporter",
            "--program",
            "dart",
            "--workdir",
            "packages/app",
            "--",
            "test",
            "--reporter=json",
        ])
        .unwrap();

        let config = TestConfig::from(args);
        assert_eq!(config.command.program, "dart");
        assert_eq!(config.command.args, vec!["test", "--reporter=json"]);
        assert_eq!(config.command.workdir, Some(PathBuf::from("packages/app")));
    }
}
