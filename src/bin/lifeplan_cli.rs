use std::process::ExitCode;

use lifeplan::{cli::run_cli, init};

fn main() -> ExitCode {
    init();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
