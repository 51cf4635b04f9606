//! # Logging
//!
//! Shared `tracing` setup for every binary. Verbosity comes from `-v`
//! flags unless `RUST_LOG` is set; output always goes to stderr.

use clap::Args;
use tracing_subscriber::EnvFilter;

/// Logging flags flattened into every binary's arguments.
#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Enable verbose logging on stderr. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit log lines as JSON.
    #[arg(long)]
    pub log_json: bool,
}

/// Filter directive for a `-v` count.
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
pub fn init_tracing(args: &LogArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(args.verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}
