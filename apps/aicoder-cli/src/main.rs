//! aicoder binary entry point.
//!
//! Parses arguments, initializes logging, runs one edit, and maps the
//! outcome to a console line and an exit code.

mod cli;
mod logging;

use std::process::ExitCode;

use aicoder_core::{CoreError, EditOutcome};
use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_json) {
        eprintln!("warning: {e}");
    }

    let report = Report::from_result(cli.run().await);
    if report.code == 0 {
        println!("{}", report.message);
    } else {
        eprintln!("{}", report.message);
    }
    ExitCode::from(report.code)
}

/// Console line and exit code for one run.
#[derive(Debug, PartialEq, Eq)]
struct Report {
    message: String,
    code: u8,
}

impl Report {
    fn from_result(result: Result<EditOutcome, CoreError>) -> Self {
        match result {
            Ok(outcome) => Self {
                message: format!("Successfully updated {}", outcome.path.display()),
                code: 0,
            },
            Err(e) => Self {
                message: format!("Error updating file: {e}"),
                code: e.exit_code(),
            },
        }
    }
}
