//! `inventory [--type components|screens] [--format text|json] [--filter <regex>] [--component-type <type>]`
//!
//! List the components or screens available to a project.

use std::process::ExitCode;

use clap::Parser;

use uxm_cli::inventory::{run_inventory, InventoryArgs, EXIT_SCAN_ERROR};
use uxm_cli::logging::{init_tracing, LogArgs};

/// List project, library and bundled uxscii components, or project screens.
#[derive(Parser, Debug)]
#[command(name = "inventory", version, about)]
struct Cli {
    #[command(flatten)]
    args: InventoryArgs,

    #[command(flatten)]
    log: LogArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match run_inventory(&cli.args, &mut std::io::stdout().lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("✗ Unexpected Error: {e:#}");
            ExitCode::from(EXIT_SCAN_ERROR)
        }
    }
}
