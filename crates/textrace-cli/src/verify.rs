//! # Verify Subcommand
//!
//! Re-runs full chain verification on an exported chain and prints the
//! same JSON the service returns from `GET /api/blockchain/verify`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use textrace_ledger::verify_blocks;

use crate::snapshot::load_chain;
use crate::{EXIT_CORRUPT, EXIT_OK};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Exported chain: `{length, chain}` or an array of blocks.
    #[arg(long, value_name = "FILE")]
    pub chain: PathBuf,
}

/// Execute `textrace verify`.
///
/// Returns 0 for an intact chain, 2 for a corrupt one or a snapshot whose
/// `length` disagrees with its blocks.
pub fn run_verify(args: &VerifyArgs, out: &mut impl Write) -> Result<u8> {
    let loaded = load_chain(&args.chain)?;
    let verification = verify_blocks(&loaded.blocks);
    tracing::debug!(blocks = loaded.blocks.len(), valid = verification.is_valid(), "verified chain");

    writeln!(out, "{}", serde_json::to_string_pretty(&verification)?)?;

    if let Some((declared, actual)) = loaded.length_mismatch() {
        writeln!(out, "FAIL: snapshot declares length {declared} but contains {actual} blocks")?;
        return Ok(EXIT_CORRUPT);
    }

    Ok(if verification.is_valid() {
        EXIT_OK
    } else {
        EXIT_CORRUPT
    })
}
