use scdb_downloader::{cli, errors, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            cli::report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> errors::AppResult<()> {
    let matches = cli::command().get_matches();
    let invocation = cli::invocation_from_matches(&matches)?;
    logging::init(invocation.config.verbose);

    let rt =
        tokio::runtime::Runtime::new().map_err(|e| errors::AppError::IoError(e.to_string()))?;
    rt.block_on(cli::execute(invocation))
}
