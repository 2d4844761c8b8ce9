pub mod bitbucket;
pub mod cli;
pub mod config;
pub mod coverage;
pub mod error;
pub mod jenkins;
pub mod lint;
pub mod log_page;
pub mod logging;
pub mod report;
pub mod test_run;
pub mod unity_log;
pub mod util;

pub use bitbucket::BitbucketClient;
pub use config::Config;
pub use error::RelayError;
pub use util::{commit_hash_from, job_path_segments, render_response_body, repo_endpoint};
