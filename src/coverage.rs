//! Line coverage from a ReportGenerator `Summary.xml`.

use std::fs;
use std::path::Path;

use crate::error::RelayError;
use crate::report::{DataPoint, Report, ReportType};
use crate::util::{job_path_segments, with_trailing_slash};

pub const SUMMARY_FILE_NAME: &str = "Summary.xml";
pub const REPORT_KEY: &str = "coverage-report";

/// Reads the `Summary/Linecoverage` percentage below the document root.
pub fn line_coverage(path: &Path) -> Result<f64, RelayError> {
    let xml = fs::read_to_string(path).map_err(|e| RelayError::io(path, e))?;
    parse_line_coverage(&xml, path)
}

fn parse_line_coverage(xml: &str, path: &Path) -> Result<f64, RelayError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| RelayError::Xml {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let missing = |element: &str| RelayError::MissingElement {
        path: path.to_path_buf(),
        element: element.to_string(),
    };

    let summary = doc
        .root_element()
        .children()
        .find(|n| n.has_tag_name("Summary"))
        .ok_or_else(|| missing("Summary"))?;
    let text = summary
        .children()
        .find(|n| n.has_tag_name("Linecoverage"))
        .and_then(|n| n.text())
        .ok_or_else(|| missing("Summary/Linecoverage"))?
        .trim();

    text.parse::<f64>().map_err(|_| RelayError::InvalidNumber {
        path: path.to_path_buf(),
        field: "Linecoverage".to_string(),
        value: text.to_string(),
    })
}

/// Link to the HTML coverage report published by the Jenkins job.
pub fn jenkins_reports_link(jenkins_url: &str, job_name: &str) -> Result<String, RelayError> {
    let segments = job_path_segments(job_name);
    let [folder, job, ..] = segments.as_slice() else {
        return Err(RelayError::InvalidJobName(job_name.to_string()));
    };
    Ok(format!(
        "{}job/{}/job/{}/Reports/",
        with_trailing_slash(jenkins_url),
        folder,
        job
    ))
}

pub fn coverage_report(build_id: &str, link: String, line_coverage: f64) -> Report {
    Report::new(
        format!("{}: Code Coverage", build_id),
        "*Only includes line coverage.",
        ReportType::Coverage,
    )
    .with_link(link)
    .with_data(DataPoint::percentage("Line Coverage", line_coverage))
}
