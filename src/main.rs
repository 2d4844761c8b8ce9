use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match bbrelay::cli::run_cli().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            bbrelay::cli::report_failure(&err);
            ExitCode::FAILURE
        }
    }
}
