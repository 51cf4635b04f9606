//! `validate_component <component.uxm> <schema.json> [--human]`
//!
//! Full validation of one component with a structured report.

use std::process::ExitCode;

use clap::Parser;

use uxm_cli::logging::{init_tracing, LogArgs};
use uxm_cli::report::{run_validate, ValidateArgs};
use uxm_cli::EXIT_INVALID;

/// Validate a uxscii component and report errors, warnings, and stats.
#[derive(Parser, Debug)]
#[command(name = "validate_component", version, about)]
struct Cli {
    #[command(flatten)]
    args: ValidateArgs,

    #[command(flatten)]
    log: LogArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match run_validate(&cli.args, &mut std::io::stdout().lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("✗ Unexpected Error: {e:#}");
            ExitCode::from(EXIT_INVALID)
        }
    }
}
