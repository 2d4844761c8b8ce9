use serde_json::Value;

/// Joins a repository API URL and a relative endpoint path with one `/`.
pub fn repo_endpoint(repo_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        repo_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub fn commit_hash_from(v: &Value) -> Option<String> {
    v.get("hash")
        .and_then(|h| h.as_str())
        .filter(|h| !h.is_empty())
        .map(|h| h.to_string())
}

/// Renders an error response body for diagnostics: compact JSON when the body
/// parses, the raw text otherwise.
pub fn render_response_body(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => v.to_string(),
        Err(_) => text.to_string(),
    }
}

/// Percent-encodes each `/`-separated segment of a Jenkins job name.
pub fn job_path_segments(job_name: &str) -> Vec<String> {
    job_name
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect()
}

/// Makes sure a base URL ends with exactly one `/`.
pub fn with_trailing_slash(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}
