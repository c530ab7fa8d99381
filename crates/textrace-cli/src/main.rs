//! # textrace CLI entry point
//!
//! Parses arguments and dispatches to the subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use textrace_cli::digest::{run_digest, DigestArgs};
use textrace_cli::stats::{run_stats, StatsArgs};
use textrace_cli::verify::{run_verify, VerifyArgs};

/// Offline tools for textrace hash-chain exports.
#[derive(Parser, Debug)]
#[command(name = "textrace", version, about, long_about = None)]
struct Cli {
    /// Verbose logging to stderr. Repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify every block of an exported chain.
    Verify(VerifyArgs),

    /// Summarize an exported chain.
    Stats(StatsArgs),

    /// Recompute the hash of one exported block.
    Digest(DigestArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Verify(args) => run_verify(args, &mut stdout),
        Commands::Stats(args) => run_stats(args, &mut stdout),
        Commands::Digest(args) => run_digest(args, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
