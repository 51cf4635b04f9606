//! `build_index [templates_dir] [output_file]`
//!
//! Regenerate the template library index.

use std::process::ExitCode;

use clap::Parser;

use uxm_cli::index::{run_build_index, IndexArgs};
use uxm_cli::logging::{init_tracing, LogArgs};
use uxm_cli::EXIT_INVALID;

/// Build a searchable index of uxscii component templates.
#[derive(Parser, Debug)]
#[command(name = "build_index", version, about)]
struct Cli {
    #[command(flatten)]
    args: IndexArgs,

    #[command(flatten)]
    log: LogArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match run_build_index(&cli.args, &mut std::io::stdout().lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("✗ Error: {e:#}");
            ExitCode::from(EXIT_INVALID)
        }
    }
}
