use std::process::ExitCode;
use urlhash_core::logging;

mod cli;

use crate::cli::Cli;

fn main() -> ExitCode {
    // Initialize logging as early as possible; stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match Cli::run_from_args() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("urlhash error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
