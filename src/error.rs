//! Error types for bbrelay.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while collecting inputs or talking to Bitbucket/Jenkins.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Missing env {0}")]
    MissingEnv(&'static str),

    #[error("{method} {url} failed {status}")]
    Http {
        method: String,
        url: String,
        status: u16,
        request_body: Option<String>,
        response_body: String,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to parse XML {path}: {reason}")]
    Xml { path: PathBuf, reason: String },

    #[error("{path}: missing {element}")]
    MissingElement { path: PathBuf, element: String },

    #[error("{path}: {field} is not a number: {value:?}")]
    InvalidNumber {
        path: PathBuf,
        field: String,
        value: String,
    },

    #[error("File not found: {}", .0.display())]
    LintReportNotFound(PathBuf),

    #[error("Unexpected response from {url}: {reason}")]
    UnexpectedResponse { url: String, reason: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JOB_NAME must contain a folder and a job, got {0:?}")]
    InvalidJobName(String),

    #[error("JENKINS_API_KEY must be in the form user:token")]
    InvalidCredentials,

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RelayError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RelayError::Io {
            path: path.into(),
            source,
        }
    }
}
