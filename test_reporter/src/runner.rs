//! Test runner invocation
//!
//! The runner is started once, synchronously, and its whole stdout is captured
//! before any parsing happens. There is no timeout.

use std::env;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{ReportError, ReportResult};

pub const DEFAULT_PROGRAM: &str = "flutter";
pub const DEFAULT_ARGS: [&str; 4] = ["test", "--coverage", "--reporter", "json"];

/// Captured result of one runner invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub success: bool,
    /// `None` when the runner was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCommand {
    pub program: String,
    pub args: Vec<String>,
    pub workdir: Option<PathBuf>,
}

impl Default for TestCommand {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_ARGS)
    }
}

impl TestCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            workdir: None,
        }
    }

    pub fn workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    fn resolve_program(&self) -> ReportResult<PathBuf> {
        let cwd = match &self.workdir {
            Some(dir) => dir.clone(),
            None => env::current_dir().map_err(|err| ReportError::spawn(&self.program, err))?,
        };
        which::which_in(&self.program, env::var_os("PATH"), cwd).map_err(|err| {
            ReportError::RunnerNotFound {
                program: self.program.clone(),
                details: err.to_string(),
            }
        })
    }

    /// Run to completion and capture its output
    pub fn run(&self) -> ReportResult<RunOutput> {
        let program = self.resolve_program()?;
        info!(program = %program.display(), args = ?self.args, "Running tests");

        let mut cmd = Command::new(&program);
        cmd.args(&self.args).stdin(Stdio::null());
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .map_err(|err| ReportError::spawn(&self.program, err))?;

        let run = RunOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(
            success = run.success,
            code = ?run.code,
            stdout_bytes = run.stdout.len(),
            stderr = %run.stderr,
            "Test runner finished"
        );
        Ok(run)
    }
}
