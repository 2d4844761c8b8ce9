use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::{
    bitbucket::BitbucketClient,
    config::{BuildEnv, Config, LogPageConfig},
    coverage,
    error::RelayError,
    jenkins::JenkinsClient,
    lint::{self, LintOutcome, LintSummary},
    log_page::{self, LogLocations, LogPage},
    logging::init_logging,
    report::{BuildState, BuildStatus, Report},
    test_run::{self, TestMode, TestRunSummary},
    unity_log::{self, ErrorPatterns},
    util::render_response_body,
};

#[derive(Parser, Debug)]
#[command(name = "bbrelay", version, about = "Relay Jenkins results to Bitbucket Cloud", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send the line coverage report for a commit
    Coverage {
        /// The commit hash the report will be sent to
        commit: String,
        /// Directory in the Jenkins workspace holding Summary.xml
        coverage_results_path: PathBuf,
    },
    /// Send the Unity test report for a commit
    TestReport {
        /// The commit hash the report will be sent to
        commit: String,
        /// Directory in the Jenkins workspace holding the results XML
        test_results_path: PathBuf,
        /// The mode the Unity tests ran in
        #[arg(value_enum)]
        test_mode: TestMode,
    },
    /// Send the dotnet format lint report for a commit
    LintReport {
        /// Path to the dotnet format JSON report
        lint_report_path: PathBuf,
        /// The commit hash the report will be sent to
        commit: String,
        /// Whether the lint check passed
        #[arg(value_enum)]
        result: LintOutcome,
    },
    /// Set the build status of a commit
    BuildStatus {
        /// Full SHA of the commit
        pr_commit: String,
        #[arg(value_enum)]
        pr_status: BuildState,
    },
    /// Print the full SHA for a short commit hash
    CommitHash {
        /// Short hash of the pull request's commit
        pr_commit: String,
    },
    /// Print the first known Unity failure found in a log
    UnityFailure {
        /// Path to the log to scan
        log: PathBuf,
        /// File listing known error messages, one per line
        #[arg(long, default_value = unity_log::DEFAULT_ERRORS_FILE)]
        errors: PathBuf,
    },
    /// Render the HTML log page for the current build
    LogPage {
        /// Jinja template to render instead of the workspace or built-in one
        #[arg(long)]
        template: Option<PathBuf>,
        /// Output file (defaults to $WORKING_DIR/logs.html)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Coverage {
            commit,
            coverage_results_path,
        } => coverage_cmd(&commit, &coverage_results_path).await?,
        Commands::TestReport {
            commit,
            test_results_path,
            test_mode,
        } => test_report_cmd(&commit, &test_results_path, test_mode).await?,
        Commands::LintReport {
            lint_report_path,
            commit,
            result,
        } => lint_report_cmd(&lint_report_path, &commit, result).await?,
        Commands::BuildStatus {
            pr_commit,
            pr_status,
        } => build_status_cmd(&pr_commit, pr_status).await?,
        Commands::CommitHash { pr_commit } => commit_hash_cmd(&pr_commit).await?,
        Commands::UnityFailure { log, errors } => unity_failure_cmd(&log, &errors)?,
        Commands::LogPage { template, output } => {
            log_page_cmd(template.as_deref(), output.as_deref()).await?
        }
    }

    Ok(())
}

/// Prints failure diagnostics to stderr. HTTP failures include the request
/// that was sent and the server's error response.
pub fn report_failure(err: &anyhow::Error) {
    eprintln!("Error: {:#}", err);
    if let Some(RelayError::Http {
        request_body,
        response_body,
        ..
    }) = err.downcast_ref::<RelayError>()
    {
        if let Some(body) = request_body {
            eprintln!("Initial Request: {}", body);
        }
        eprintln!("Response Error: {}", render_response_body(response_body));
    }
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb
}

fn bitbucket_client() -> Result<BitbucketClient> {
    let cfg = Config::from_env()?;
    Ok(BitbucketClient::new(cfg)?)
}

async fn send_report(commit: &str, report_key: &str, report: &Report) -> Result<()> {
    let client = bitbucket_client()?;
    let pb = spinner("Sending report...");
    let res = client.put_report(commit, report_key, report).await;
    pb.finish_and_clear();
    res?;
    info!(commit, report_key, title = report.title.as_str(), "Report sent");
    Ok(())
}

async fn coverage_cmd(commit: &str, results_dir: &Path) -> Result<()> {
    let build = BuildEnv::from_env();
    let summary_path = results_dir.join(coverage::SUMMARY_FILE_NAME);
    let line_coverage = coverage::line_coverage(&summary_path)
        .with_context(|| format!("Failed to read coverage from {}", summary_path.display()))?;
    let link = coverage::jenkins_reports_link(&build.jenkins_url, build.job_name()?)?;
    let report = coverage::coverage_report(build.build_id()?, link, line_coverage);
    debug!(line_coverage, "Parsed coverage summary");

    send_report(commit, coverage::REPORT_KEY, &report).await
}

async fn test_report_cmd(commit: &str, results_dir: &Path, mode: TestMode) -> Result<()> {
    let build = BuildEnv::from_env();
    let results_path = results_dir.join(mode.results_file_name());
    let summary = TestRunSummary::from_file(&results_path)
        .with_context(|| format!("Failed to read test results from {}", results_path.display()))?;
    debug!(
        result = summary.result.as_str(),
        total = summary.total,
        failed = summary.failed,
        "Parsed test run"
    );
    let report = test_run::test_report(build.build_id()?, mode, &summary);

    send_report(commit, &mode.report_key(), &report).await
}

async fn lint_report_cmd(report_path: &Path, commit: &str, outcome: LintOutcome) -> Result<()> {
    let details = if outcome.passed() {
        lint::NO_REPORT.to_string()
    } else {
        let summary = LintSummary::from_file(report_path)?;
        summary.log();
        summary.render()
    };
    let report = lint::lint_report(outcome, details);

    let client = bitbucket_client()?;
    let url = client.endpoint(&format!("commit/{}/reports/{}", commit, lint::REPORT_KEY))?;
    let body = serde_json::to_string(&report)?;
    info!(%url, body = body.as_str(), "Sending lint report");

    let pb = spinner("Sending lint report...");
    let res = client.put_report(commit, lint::REPORT_KEY, &report).await;
    pb.finish_and_clear();
    res?;
    Ok(())
}

async fn build_status_cmd(commit: &str, state: BuildState) -> Result<()> {
    let build = BuildEnv::from_env();
    let status = BuildStatus::new(build.build_id()?, state, build.build_url()?);

    let client = bitbucket_client()?;
    let pb = spinner("Sending build status...");
    let res = client.post_build_status(commit, &status).await;
    pb.finish_and_clear();
    res?;
    info!(commit, state = state.as_str(), "Build status sent");
    Ok(())
}

async fn commit_hash_cmd(short: &str) -> Result<()> {
    let client = bitbucket_client()?;
    let pb = spinner("Resolving commit...");
    let res = client.commit_hash(short).await;
    pb.finish_and_clear();
    let hash = res?;

    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", hash)?;
    stdout.flush()?;
    Ok(())
}

fn unity_failure_cmd(log: &Path, errors: &Path) -> Result<()> {
    let patterns = ErrorPatterns::from_file(errors)
        .with_context(|| format!("Failed to load error patterns from {}", errors.display()))?;
    debug!(patterns = patterns.len(), "Loaded error patterns");
    let line = unity_log::first_failure_in_file(log, &patterns)?;

    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}

async fn log_page_cmd(template: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let cfg = LogPageConfig::from_env()?;
    let jenkins = JenkinsClient::new(&cfg.jenkins_user, &cfg.jenkins_token)?;

    let pb = spinner("Fetching Jenkins console...");
    let console = jenkins.console_text(&cfg.build_url).await;
    pb.finish_and_clear();
    let console = console?;

    let locations = LogLocations::under(&cfg.working_dir);
    let page = LogPage::collect(cfg.ticket.as_str(), console, &locations)?;
    let template = log_page::load_template(template, cfg.workspace.as_deref())?;
    page.write(&template, output.unwrap_or(locations.output.as_path()))?;
    Ok(())
}
