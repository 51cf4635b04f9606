//! `quick_validate <component.uxm> <schema.json>`
//!
//! Fast pass/fail check of one component for authoring workflows.

use std::process::ExitCode;

use clap::Parser;

use uxm_cli::logging::{init_tracing, LogArgs};
use uxm_cli::quick::{run_quick, QuickArgs};
use uxm_cli::EXIT_INVALID;

/// Quick validation of a uxscii component.
#[derive(Parser, Debug)]
#[command(name = "quick_validate", version, about)]
struct Cli {
    #[command(flatten)]
    args: QuickArgs,

    #[command(flatten)]
    log: LogArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match run_quick(&cli.args, &mut std::io::stdout().lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            println!("✗ Unexpected Error: {e:#}");
            ExitCode::from(EXIT_INVALID)
        }
    }
}
