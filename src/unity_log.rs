//! Finds the first known Unity failure in a build log.

use std::fs;
use std::path::Path;

use crate::error::RelayError;

pub const DEFAULT_ERRORS_FILE: &str = "../logErrors.txt";

/// Substrings that mark a failed Unity build, one per line in the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorPatterns(Vec<String>);

impl ErrorPatterns {
    pub fn from_file(path: &Path) -> Result<Self, RelayError> {
        let raw = fs::read_to_string(path).map_err(|e| RelayError::io(path, e))?;
        Ok(Self::parse(&raw))
    }

    pub fn parse(raw: &str) -> Self {
        Self(
            raw.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn matches(&self, line: &str) -> bool {
        self.0.iter().any(|p| line.contains(p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// First line of `log` containing any pattern; empty when nothing matches.
pub fn first_failure<'a>(log: &'a str, patterns: &ErrorPatterns) -> &'a str {
    log.lines().find(|line| patterns.matches(line)).unwrap_or("")
}

pub fn first_failure_in_file(log_path: &Path, patterns: &ErrorPatterns) -> Result<String, RelayError> {
    let bytes = fs::read(log_path).map_err(|e| RelayError::io(log_path, e))?;
    let log = String::from_utf8_lossy(&bytes);
    Ok(first_failure(&log, patterns).to_string())
}
