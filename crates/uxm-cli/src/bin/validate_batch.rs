//! `validate_batch <dir> <schema.json> [--json] [--recursive] [--screens]`
//!
//! Run the full validator over every component in a directory.

use std::process::ExitCode;

use clap::Parser;

use uxm_cli::batch::{run_batch, BatchArgs};
use uxm_cli::logging::{init_tracing, LogArgs};
use uxm_cli::EXIT_INVALID;

/// Validate every uxscii component in a directory.
#[derive(Parser, Debug)]
#[command(name = "validate_batch", version, about)]
struct Cli {
    #[command(flatten)]
    args: BatchArgs,

    #[command(flatten)]
    log: LogArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match run_batch(&cli.args, &mut std::io::stdout().lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("✗ Unexpected Error: {e:#}");
            ExitCode::from(EXIT_INVALID)
        }
    }
}
