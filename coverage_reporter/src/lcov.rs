//! LCOV tracefile reader
//!
//! Only line coverage is kept. Each `SF:` .. `end_of_record` block becomes one
//! [`FileCoverage`] built from its `LF:`/`LH:` summary counters, or from the
//! block's `DA:` lines when a producer omits the summary.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use report_core::round_percent;
use tracing::debug;

use crate::error::{ReportError, ReportResult};

/// Line coverage for one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCoverage {
    pub path: String,
    pub lines_hit: u64,
    pub lines_found: u64,
}

impl FileCoverage {
    pub fn percent(&self) -> f64 {
        round_percent(self.lines_hit, self.lines_found)
    }
}

/// All file records of a tracefile, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    files: Vec<FileCoverage>,
}

impl CoverageReport {
    pub fn files(&self) -> &[FileCoverage] {
        &self.files
    }

    pub fn total_hit(&self) -> u64 {
        self.files.iter().map(|f| f.lines_hit).sum()
    }

    pub fn total_found(&self) -> u64 {
        self.files.iter().map(|f| f.lines_found).sum()
    }

    /// Aggregate percentage over the summed counters of every file
    pub fn percent(&self) -> f64 {
        round_percent(self.total_hit(), self.total_found())
    }

    // A repeated SF path replaces the earlier counters in place.
    fn insert(&mut self, index: &mut HashMap<String, usize>, file: FileCoverage) {
        match index.get(&file.path) {
            Some(&pos) => self.files[pos] = file,
            None => {
                index.insert(file.path.clone(), self.files.len());
                self.files.push(file);
            }
        }
    }
}

/// Record opened by `SF:` and not yet closed
struct OpenRecord {
    path: String,
    opened_at: usize,
    lines_found: Option<u64>,
    lines_hit: Option<u64>,
    da_found: u64,
    da_hit: u64,
}

impl OpenRecord {
    fn new(path: &str, opened_at: usize) -> Self {
        Self {
            path: path.to_string(),
            opened_at,
            lines_found: None,
            lines_hit: None,
            da_found: 0,
            da_hit: 0,
        }
    }

    /// DA:<line>,<hits>[,<checksum>]
    fn add_line(&mut self, line_no: usize, value: &str) -> ReportResult<()> {
        let mut parts = value.split(',');
        let (Some(_line), Some(hits)) = (parts.next(), parts.next()) else {
            return Err(ReportError::format(line_no, format!("bad DA entry {value:?}")));
        };
        // Some producers emit counts in scientific notation.
        let hits: f64 = hits
            .trim()
            .parse()
            .map_err(|_| ReportError::format(line_no, format!("bad DA hit count {hits:?}")))?;

        self.da_found += 1;
        if hits > 0.0 {
            self.da_hit += 1;
        }
        Ok(())
    }

    fn finish(self, line_no: usize) -> ReportResult<FileCoverage> {
        let lines_found = self.lines_found.unwrap_or(self.da_found);
        let lines_hit = self.lines_hit.unwrap_or(self.da_hit);
        if lines_hit > lines_found {
            return Err(ReportError::format(
                line_no,
                format!(
                    "{} reports {} lines hit out of {} found",
                    self.path, lines_hit, lines_found
                ),
            ));
        }

        Ok(FileCoverage {
            path: self.path,
            lines_hit,
            lines_found,
        })
    }
}

fn parse_count(line_no: usize, key: &str, value: &str) -> ReportResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ReportError::format(line_no, format!("bad {key} counter {value:?}")))
}

/// Parse tracefile contents
pub fn parse(content: &str) -> ReportResult<CoverageReport> {
    let mut report = CoverageReport::default();
    let mut index = HashMap::new();
    let mut current: Option<OpenRecord> = None;

    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line == "end_of_record" {
            let record = current.take().ok_or_else(|| {
                ReportError::format(line_no, "end_of_record without an open SF record")
            })?;
            report.insert(&mut index, record.finish(line_no)?);
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(ReportError::format(line_no, format!("unrecognized line {line:?}")));
        };

        match key {
            "SF" => {
                if let Some(open) = &current {
                    return Err(ReportError::format(
                        line_no,
                        format!(
                            "SF before end_of_record of {} (opened at line {})",
                            open.path, open.opened_at
                        ),
                    ));
                }
                if value.trim().is_empty() {
                    return Err(ReportError::format(line_no, "SF without a file path"));
                }
                current = Some(OpenRecord::new(value.trim(), line_no));
            }
            "LF" | "LH" | "DA" => {
                let record = current.as_mut().ok_or_else(|| {
                    ReportError::format(line_no, format!("{key} outside of an SF record"))
                })?;
                match key {
                    "LF" => record.lines_found = Some(parse_count(line_no, key, value)?),
                    "LH" => record.lines_hit = Some(parse_count(line_no, key, value)?),
                    _ => record.add_line(line_no, value)?,
                }
            }
            // TN, FN, FNDA, FNF, FNH, BRDA, BRF, BRH, VER ...
            _ => {}
        }
    }

    if let Some(open) = current {
        return Err(ReportError::format(
            open.opened_at,
            format!("record for {} is missing end_of_record", open.path),
        ));
    }

    if report.files.is_empty() {
        return Err(ReportError::Empty);
    }

    Ok(report)
}

/// Read and parse a tracefile from disk
pub fn read(path: &Path) -> ReportResult<CoverageReport> {
    let content = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ReportError::ReportNotFound(path.to_path_buf()),
        _ => ReportError::io(path, err),
    })?;

    let report = parse(&content)?;
    debug!(
        path = %path.display(),
        files = report.files().len(),
        lines_hit = report.total_hit(),
        lines_found = report.total_found(),
        "Parsed coverage report"
    );
    Ok(report)
}
