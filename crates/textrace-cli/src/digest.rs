//! # Digest Subcommand
//!
//! Recomputes one exported block's hash from its own fields and compares it
//! with the stored `hash`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::snapshot::load_block;
use crate::{EXIT_CORRUPT, EXIT_OK};

#[derive(Args, Debug)]
pub struct DigestArgs {
    /// One exported block as JSON.
    #[arg(long, value_name = "FILE")]
    pub block: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DigestReport {
    index: u64,
    stored_hash: String,
    computed_hash: String,
    matches: bool,
}

/// Execute `textrace digest`. Returns 2 when the stored hash is stale.
pub fn run_digest(args: &DigestArgs, out: &mut impl Write) -> Result<u8> {
    let block = load_block(&args.block)?;
    let computed = block
        .compute_hash()
        .context("failed to canonicalize block content")?;

    let report = DigestReport {
        index: block.index,
        matches: computed == block.hash,
        stored_hash: block.hash,
        computed_hash: computed,
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;

    Ok(if report.matches { EXIT_OK } else { EXIT_CORRUPT })
}
