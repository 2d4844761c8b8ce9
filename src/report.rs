//! Payloads for the Bitbucket commit reports and build status endpoints.

use clap::ValueEnum;
use serde::Serialize;

pub const REPORTER: &str = "Jenkins";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportType {
    Coverage,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportResult {
    Passed,
    Failed,
}

impl ReportResult {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            ReportResult::Passed
        } else {
            ReportResult::Failed
        }
    }
}

/// One entry of a report's `data` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum DataPoint {
    Percentage { title: String, value: f64 },
    Boolean { title: String, value: bool },
    Text { title: String, value: String },
}

impl DataPoint {
    pub fn percentage(title: impl Into<String>, value: f64) -> Self {
        DataPoint::Percentage {
            title: title.into(),
            value,
        }
    }

    pub fn boolean(title: impl Into<String>, value: bool) -> Self {
        DataPoint::Boolean {
            title: title.into(),
            value,
        }
    }

    pub fn text(title: impl Into<String>, value: impl Into<String>) -> Self {
        DataPoint::Text {
            title: title.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub details: String,
    pub report_type: ReportType,
    pub reporter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ReportResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub data: Vec<DataPoint>,
}

impl Report {
    pub fn new(title: impl Into<String>, details: impl Into<String>, report_type: ReportType) -> Self {
        Self {
            title: title.into(),
            details: details.into(),
            report_type,
            reporter: REPORTER.to_string(),
            result: None,
            link: None,
            data: Vec::new(),
        }
    }

    pub fn with_result(mut self, result: ReportResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_data(mut self, point: DataPoint) -> Self {
        self.data.push(point);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum BuildState {
    #[value(name = "SUCCESSFUL")]
    #[serde(rename = "SUCCESSFUL")]
    Successful,
    #[value(name = "FAILED")]
    #[serde(rename = "FAILED")]
    Failed,
    #[value(name = "STOPPED")]
    #[serde(rename = "STOPPED")]
    Stopped,
    #[value(name = "INPROGRESS")]
    #[serde(rename = "INPROGRESS")]
    InProgress,
}

impl BuildState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildState::Successful => "SUCCESSFUL",
            BuildState::Failed => "FAILED",
            BuildState::Stopped => "STOPPED",
            BuildState::InProgress => "INPROGRESS",
        }
    }
}

/// Commit-level build status shown on pull requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildStatus {
    pub key: String,
    pub state: BuildState,
    pub description: String,
    pub url: String,
}

impl BuildStatus {
    pub fn new(build_id: impl Into<String>, state: BuildState, build_url: impl Into<String>) -> Self {
        Self {
            key: build_id.into(),
            state,
            description: state.as_str().to_string(),
            url: build_url.into(),
        }
    }
}
