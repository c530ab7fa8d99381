//! # Stats Subcommand
//!
//! Prints the `GET /api/blockchain/stats` summary for an exported chain.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use textrace_ledger::LedgerStats;

use crate::snapshot::load_chain;
use crate::EXIT_OK;

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Exported chain: `{length, chain}` or an array of blocks.
    #[arg(long, value_name = "FILE")]
    pub chain: PathBuf,
}

/// Execute `textrace stats`. A corrupt chain is reported, not an error.
pub fn run_stats(args: &StatsArgs, out: &mut impl Write) -> Result<u8> {
    let loaded = load_chain(&args.chain)?;
    let stats = LedgerStats::of(&loaded.blocks);
    writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
    Ok(EXIT_OK)
}
