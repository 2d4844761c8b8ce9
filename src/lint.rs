//! `dotnet format --report` results.

use std::fs;
use std::path::{Component, Path, PathBuf};

use clap::ValueEnum;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::info;

use crate::error::RelayError;
use crate::report::{DataPoint, Report, ReportResult, ReportType};

pub const REPORT_KEY: &str = "lint-test-report";
pub const NO_REPORT: &str = "No report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LintOutcome {
    #[value(name = "Pass")]
    Pass,
    #[value(name = "Fail")]
    Fail,
}

impl LintOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, LintOutcome::Pass)
    }

    fn details(&self) -> &'static str {
        match self {
            LintOutcome::Pass => "0 Formatting errors",
            LintOutcome::Fail => "Formatting Errors Detected",
        }
    }
}

/// Formatting errors per file, in the order files first appear in the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintSummary {
    pub total: usize,
    pub per_file: IndexMap<String, usize>,
}

impl LintSummary {
    pub fn from_file(path: &Path) -> Result<Self, RelayError> {
        let path = normalize_path(path);
        if !path.is_file() {
            return Err(RelayError::LintReportNotFound(path));
        }
        let raw = fs::read_to_string(&path).map_err(|e| RelayError::io(&path, e))?;
        let data: Value = serde_json::from_str(&raw)?;
        Ok(Self::from_report(&data))
    }

    /// Every entry carrying both `FileName` and `FileChanges` is one error.
    pub fn from_report(data: &Value) -> Self {
        let mut summary = LintSummary::default();
        let entries = data.as_array().map(Vec::as_slice).unwrap_or_default();
        for entry in entries {
            let (Some(file_name), Some(_)) = (entry.get("FileName"), entry.get("FileChanges")) else {
                continue;
            };
            let file_name = match file_name.as_str() {
                Some(s) => s.to_string(),
                None => file_name.to_string(),
            };
            *summary.per_file.entry(file_name).or_insert(0) += 1;
            summary.total += 1;
        }
        summary
    }

    pub fn render(&self) -> String {
        let mut out = format!("Total number of errors: {}", self.total);
        for (file, errors) in &self.per_file {
            out.push_str(&format!("\n{} errors = {}", file, errors));
        }
        out
    }

    pub fn log(&self) {
        info!(total = self.total, "Total number of errors: {}", self.total);
        for (file, errors) in &self.per_file {
            info!(file = file.as_str(), errors = *errors, "{} errors = {}", file, errors);
        }
    }
}

/// Lexical normalization: drops `.` and folds `..` into its parent.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !matches!(
                    out.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

pub fn lint_report(outcome: LintOutcome, report_details: impl Into<String>) -> Report {
    Report::new("Linting Report", outcome.details(), ReportType::Test)
        .with_result(ReportResult::from_passed(outcome.passed()))
        .with_data(DataPoint::text("Report Details", report_details))
        .with_data(DataPoint::boolean("Linting check passed?", outcome.passed()))
}
