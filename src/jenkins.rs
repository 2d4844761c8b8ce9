use reqwest::Client;
use tracing::info;

use crate::bitbucket::parse_url;
use crate::error::RelayError;
use crate::log_page::split_keeping_newlines;
use crate::util::with_trailing_slash;

/// Reads build output from the Jenkins remote API with basic auth.
pub struct JenkinsClient {
    http: Client,
    user: String,
    token: String,
}

impl JenkinsClient {
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Result<Self, RelayError> {
        let http = Client::builder()
            .user_agent(concat!("bbrelay/", env!("CARGO_PKG_VERSION")))
            .use_rustls_tls()
            .build()?;
        Ok(Self {
            http,
            user: user.into(),
            token: token.into(),
        })
    }

    /// Console output of the build at `build_url`, one entry per line with its
    /// terminator.
    pub async fn console_text(&self, build_url: &str) -> Result<Vec<String>, RelayError> {
        let url = parse_url(&format!("{}consoleText", with_trailing_slash(build_url)))?;
        let res = self
            .http
            .get(url.clone())
            .basic_auth(&self.user, Some(&self.token))
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(RelayError::Http {
                method: "GET".to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                request_body: None,
                response_body: text,
            });
        }
        let lines = split_keeping_newlines(&text);
        info!(%url, lines = lines.len(), "Fetched Jenkins console output");
        Ok(lines)
    }
}
