use std::env;
use std::path::PathBuf;

use crate::error::RelayError;

/// Only used outside Jenkins; Jenkins sets `JENKINS_URL` on every build.
pub const DEFAULT_JENKINS_URL: &str = "http://jenkins.varlab.org/";

/// Bitbucket access for the report and status endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    pub access_token: String,
    pub repo_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelayError> {
        let access_token = required(&lookup, "BITBUCKET_ACCESS_TOKEN")?;
        let repo_url = required(&lookup, "JOB_REPO")?;
        Ok(Self {
            access_token,
            repo_url,
        })
    }
}

/// Jenkins build variables. Each subcommand only requires the ones it uses.
#[derive(Debug, Clone, Default)]
pub struct BuildEnv {
    build_id: Option<String>,
    build_url: Option<String>,
    job_name: Option<String>,
    pub jenkins_url: String,
}

impl BuildEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            build_id: lookup("BUILD_ID"),
            build_url: lookup("BUILD_URL"),
            job_name: lookup("JOB_NAME"),
            jenkins_url: lookup("JENKINS_URL").unwrap_or_else(|| DEFAULT_JENKINS_URL.to_string()),
        }
    }

    pub fn build_id(&self) -> Result<&str, RelayError> {
        self.build_id
            .as_deref()
            .ok_or(RelayError::MissingEnv("BUILD_ID"))
    }

    pub fn build_url(&self) -> Result<&str, RelayError> {
        self.build_url
            .as_deref()
            .ok_or(RelayError::MissingEnv("BUILD_URL"))
    }

    pub fn job_name(&self) -> Result<&str, RelayError> {
        self.job_name
            .as_deref()
            .ok_or(RelayError::MissingEnv("JOB_NAME"))
    }
}

/// Inputs for rendering the HTML log page.
#[derive(Debug, Clone)]
pub struct LogPageConfig {
    pub jenkins_user: String,
    pub jenkins_token: String,
    pub build_url: String,
    pub working_dir: PathBuf,
    pub ticket: String,
    pub workspace: Option<PathBuf>,
}

impl LogPageConfig {
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelayError> {
        let api_key = required(&lookup, "JENKINS_API_KEY")?;
        let (jenkins_user, jenkins_token) = api_key
            .split_once(':')
            .ok_or(RelayError::InvalidCredentials)?;

        Ok(Self {
            jenkins_user: jenkins_user.to_string(),
            jenkins_token: jenkins_token.to_string(),
            build_url: required(&lookup, "BUILD_URL")?,
            working_dir: PathBuf::from(required(&lookup, "WORKING_DIR")?),
            ticket: lookup("TICKET_NUMBER").unwrap_or_default(),
            workspace: lookup("WORKSPACE").map(PathBuf::from),
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, RelayError> {
    lookup(key)
        .filter(|v| !v.is_empty())
        .ok_or(RelayError::MissingEnv(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_requires_token_and_repo() {
        let err = Config::from_lookup(lookup_from(&[("JOB_REPO", "https://bb/repo")])).unwrap_err();
        assert!(matches!(err, RelayError::MissingEnv("BITBUCKET_ACCESS_TOKEN")));

        let cfg = Config::from_lookup(lookup_from(&[
            ("BITBUCKET_ACCESS_TOKEN", "secret"),
            ("JOB_REPO", "https://bb/repo"),
        ]))
        .unwrap();
        assert_eq!(cfg.access_token, "secret");
        assert_eq!(cfg.repo_url, "https://bb/repo");
    }

    #[test]
    fn test_empty_variable_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            ("BITBUCKET_ACCESS_TOKEN", ""),
            ("JOB_REPO", "https://bb/repo"),
        ]))
        .unwrap_err();
        assert!(matches!(err, RelayError::MissingEnv("BITBUCKET_ACCESS_TOKEN")));
    }

    #[test]
    fn test_build_env_defaults_jenkins_url() {
        let build = BuildEnv::from_lookup(lookup_from(&[("BUILD_ID", "42")]));
        assert_eq!(build.build_id().unwrap(), "42");
        assert_eq!(build.jenkins_url, DEFAULT_JENKINS_URL);
        assert!(matches!(
            build.build_url(),
            Err(RelayError::MissingEnv("BUILD_URL"))
        ));
    }

    #[test]
    fn test_build_env_prefers_jenkins_url_when_set() {
        let build = BuildEnv::from_lookup(lookup_from(&[("JENKINS_URL", "https://ci.example.org/")]));
        assert_eq!(build.jenkins_url, "https://ci.example.org/");
    }

    #[test]
    fn test_log_page_config_splits_credentials() {
        let cfg = LogPageConfig::from_lookup(lookup_from(&[
            ("JENKINS_API_KEY", "ci-bot:abc123"),
            ("BUILD_URL", "http://jenkins/job/x/7/"),
            ("WORKING_DIR", "/tmp/work"),
        ]))
        .unwrap();
        assert_eq!(cfg.jenkins_user, "ci-bot");
        assert_eq!(cfg.jenkins_token, "abc123");
        assert_eq!(cfg.ticket, "");
        assert!(cfg.workspace.is_none());
    }

    #[test]
    fn test_log_page_config_rejects_key_without_colon() {
        let err = LogPageConfig::from_lookup(lookup_from(&[
            ("JENKINS_API_KEY", "no-colon"),
            ("BUILD_URL", "http://jenkins/job/x/7/"),
            ("WORKING_DIR", "/tmp/work"),
        ]))
        .unwrap_err();
        assert!(matches!(err, RelayError::InvalidCredentials));
    }
}
