use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::RelayError;
use crate::report::{BuildStatus, Report};
use crate::util::{commit_hash_from, repo_endpoint};

/// Bitbucket Cloud repository API client, bearer-token authenticated.
pub struct BitbucketClient {
    http: Client,
    repo_url: Url,
    access_token: String,
}

impl BitbucketClient {
    pub fn new(config: Config) -> Result<Self, RelayError> {
        let http = Client::builder()
            .user_agent(concat!("bbrelay/", env!("CARGO_PKG_VERSION")))
            .use_rustls_tls()
            .build()?;
        let repo_url = parse_url(&config.repo_url)?;
        Ok(Self {
            http,
            repo_url,
            access_token: config.access_token,
        })
    }

    /// Overrides the repository URL. Useful for tests with a mock server.
    pub fn with_base_url(mut self, repo_url: Url) -> Self {
        self.repo_url = repo_url;
        self
    }

    /// Resolves a (possibly abbreviated) commit hash to the full SHA.
    pub async fn commit_hash(&self, short: &str) -> Result<String, RelayError> {
        let url = self.endpoint(&format!("commit/{}/?fields=hash", short))?;
        let v = self.send(Method::GET, url.clone(), None).await?;
        commit_hash_from(&v).ok_or_else(|| RelayError::UnexpectedResponse {
            url: url.to_string(),
            reason: "no hash field".to_string(),
        })
    }

    pub async fn put_report(
        &self,
        commit: &str,
        report_key: &str,
        report: &Report,
    ) -> Result<Value, RelayError> {
        let url = self.endpoint(&format!("commit/{}/reports/{}", commit, report_key))?;
        self.send_json(Method::PUT, url, report).await
    }

    pub async fn post_build_status(
        &self,
        commit: &str,
        status: &BuildStatus,
    ) -> Result<Value, RelayError> {
        let url = self.endpoint(&format!("commit/{}/statuses/build", commit))?;
        self.send_json(Method::POST, url, status).await
    }

    /// Full URL of a repository endpoint, for logging.
    pub fn endpoint(&self, path: &str) -> Result<Url, RelayError> {
        parse_url(&repo_endpoint(self.repo_url.as_str(), path))
    }

    async fn send_json<T: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: &T,
    ) -> Result<Value, RelayError> {
        let body = serde_json::to_string(body)?;
        debug!(%method, %url, body = body.as_str(), "Sending request");
        self.send(method, url, Some(body)).await
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<Value, RelayError> {
        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .header("Accept", "application/json")
            .bearer_auth(&self.access_token);
        if let Some(body) = &body {
            req = req
                .header("Content-Type", "application/json")
                .body(body.clone());
        }

        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(RelayError::Http {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                request_body: body,
                response_body: text,
            });
        }
        info!(%method, %url, status = status.as_u16(), "Request succeeded");

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

pub(crate) fn parse_url(raw: &str) -> Result<Url, RelayError> {
    Url::parse(raw).map_err(|e| RelayError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
