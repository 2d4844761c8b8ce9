//! Unity Test Framework results (NUnit 3 XML).

use std::fs;
use std::path::Path;

use clap::ValueEnum;

use crate::error::RelayError;
use crate::report::{DataPoint, Report, ReportResult, ReportType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TestMode {
    #[value(name = "EditMode")]
    EditMode,
    #[value(name = "PlayMode")]
    PlayMode,
}

impl TestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestMode::EditMode => "EditMode",
            TestMode::PlayMode => "PlayMode",
        }
    }

    pub fn results_file_name(&self) -> &'static str {
        match self {
            TestMode::EditMode => "editmode-results.xml",
            TestMode::PlayMode => "playmode-results.xml",
        }
    }

    pub fn report_key(&self) -> String {
        format!("{}-test-report", self.as_str())
    }
}

/// Totals from the `test-run` root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRunSummary {
    /// Upper-cased `result` attribute, e.g. `PASSED` or `FAILED`.
    pub result: String,
    pub total: u32,
    pub failed: u32,
}

impl TestRunSummary {
    pub fn from_file(path: &Path) -> Result<Self, RelayError> {
        let xml = fs::read_to_string(path).map_err(|e| RelayError::io(path, e))?;
        Self::parse(&xml, path)
    }

    fn parse(xml: &str, path: &Path) -> Result<Self, RelayError> {
        let doc = roxmltree::Document::parse(xml).map_err(|e| RelayError::Xml {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let root = doc.root_element();

        let attr = |name: &str| {
            root.attribute(name)
                .ok_or_else(|| RelayError::MissingElement {
                    path: path.to_path_buf(),
                    element: format!("@{}", name),
                })
        };
        let count = |name: &str| -> Result<u32, RelayError> {
            let raw = attr(name)?;
            raw.trim().parse().map_err(|_| RelayError::InvalidNumber {
                path: path.to_path_buf(),
                field: name.to_string(),
                value: raw.to_string(),
            })
        };

        Ok(Self {
            result: attr("result")?.to_uppercase(),
            total: count("total")?,
            failed: count("failed")?,
        })
    }

    /// Anything other than a plain pass is reported as a failure.
    pub fn report_result(&self) -> ReportResult {
        ReportResult::from_passed(self.result == "PASSED")
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

pub fn test_report(build_id: &str, mode: TestMode, summary: &TestRunSummary) -> Report {
    Report::new(
        format!("{}: {} Tests", build_id, mode.as_str()),
        format!("{}/{} tests failed.", summary.failed, summary.total),
        ReportType::Test,
    )
    .with_result(summary.report_result())
    .with_data(DataPoint::boolean("All tests passed?", summary.all_passed()))
}
