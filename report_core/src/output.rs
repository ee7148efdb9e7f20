//! Step output sinks
//!
//! GitHub Actions reads step outputs from the file named by `GITHUB_OUTPUT`,
//! one `name=value` line per output. Line breaks inside a value would split
//! the record, so they are dropped on encoding.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::text::strip_line_breaks;

/// Destination for named step outputs
pub trait OutputSink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Appends outputs to the CI step output file
#[derive(Debug, Clone)]
pub struct FileOutputSink {
    path: PathBuf,
}

impl FileOutputSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSink for FileOutputSink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open step output file {}", self.path.display()))?;

        file.write_all(encode_output(name, value).as_bytes())
            .with_context(|| format!("failed to write step output {name}"))?;

        debug!(output = name, file = %self.path.display(), "Step output written");
        Ok(())
    }
}

/// Prints outputs to stdout, for runs outside CI
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutOutputSink;

impl OutputSink for StdoutOutputSink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        print!("{}", encode_output(name, value));
        Ok(())
    }
}

/// Keeps outputs in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    outputs: BTreeMap<String, String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.outputs.get(name).map(String::as_str)
    }
}

impl OutputSink for RecordingSink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        self.outputs.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// File sink when a step output path is known, stdout otherwise
pub fn sink_for(path: Option<&Path>) -> Box<dyn OutputSink> {
    match path {
        Some(path) => Box::new(FileOutputSink::new(path)),
        None => Box::new(StdoutOutputSink),
    }
}

fn encode_output(name: &str, value: &str) -> String {
    format!("{name}={}\n", strip_line_breaks(value))
}
