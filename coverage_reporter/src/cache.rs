//! Previous-run coverage cache
//!
//! A single `{"percent": <number>}` record. Loading is best-effort: a missing
//! or unreadable cache only means there is nothing to compare against.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ReportError, ReportResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageCache {
    pub percent: f64,
}

impl CoverageCache {
    pub fn new(percent: f64) -> Self {
        Self { percent }
    }
}

/// Load the cache written by a previous run, if any
pub fn load(path: &Path) -> Option<CoverageCache> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No previous coverage cache");
            return None;
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Ignoring unreadable coverage cache");
            return None;
        }
    };

    match serde_json::from_str::<CoverageCache>(&content) {
        Ok(cache) if cache.percent.is_finite() => {
            debug!(path = %path.display(), percent = cache.percent, "Loaded coverage cache");
            Some(cache)
        }
        Ok(cache) => {
            warn!(path = %path.display(), percent = cache.percent, "Ignoring non-finite coverage cache");
            None
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Ignoring corrupt coverage cache");
            None
        }
    }
}

/// Overwrite the cache at `path`, creating parent directories as needed
pub fn store(path: &Path, cache: &CoverageCache) -> ReportResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| ReportError::io(parent, err))?;
    }

    let json = serde_json::to_string(cache)?;
    fs::write(path, json).map_err(|err| ReportError::io(path, err))?;
    debug!(path = %path.display(), percent = cache.percent, "Stored coverage cache");
    Ok(())
}
