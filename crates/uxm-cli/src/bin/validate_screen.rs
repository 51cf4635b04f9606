//! `validate_screen <screen.uxm> <schema.json> [--json] [--components-dir <dir>]`
//!
//! Full validation of one screen plus its rendered example and component
//! references.

use std::process::ExitCode;

use clap::Parser;

use uxm_cli::logging::{init_tracing, LogArgs};
use uxm_cli::screen::{run_screen, ScreenArgs};
use uxm_cli::EXIT_INVALID;

/// Validate a uxscii screen and the components it is composed from.
#[derive(Parser, Debug)]
#[command(name = "validate_screen", version, about)]
struct Cli {
    #[command(flatten)]
    args: ScreenArgs,

    #[command(flatten)]
    log: LogArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match run_screen(&cli.args, &mut std::io::stdout().lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("✗ Unexpected Error: {e:#}");
            ExitCode::from(EXIT_INVALID)
        }
    }
}
