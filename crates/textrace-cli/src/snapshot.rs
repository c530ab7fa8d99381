//! Loading exported chains and blocks from disk.

use std::path::Path;

use anyhow::{bail, Context, Result};
use textrace_ledger::{Block, ChainSnapshot};

/// A chain read from a file, with the length it claimed, if any.
#[derive(Debug, Clone)]
pub struct LoadedChain {
    pub declared_length: Option<u64>,
    pub blocks: Vec<Block>,
}

impl LoadedChain {
    /// `Some((declared, actual))` when a declared length disagrees with the blocks.
    pub fn length_mismatch(&self) -> Option<(u64, u64)> {
        let actual = self.blocks.len() as u64;
        match self.declared_length {
            Some(declared) if declared != actual => Some((declared, actual)),
            _ => None,
        }
    }
}

/// Read a `{length, chain}` snapshot or a bare JSON array of blocks.
///
/// The shape is chosen from the first JSON token, so a parse failure
/// reports the offending field and position.
pub fn load_chain(path: &Path) -> Result<LoadedChain> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read chain file: {}", path.display()))?;
    let parse_context = || format!("failed to parse chain file: {}", path.display());

    match content.trim_start().chars().next() {
        Some('[') => {
            let blocks: Vec<Block> = serde_json::from_str(&content).with_context(parse_context)?;
            Ok(LoadedChain {
                declared_length: None,
                blocks,
            })
        }
        Some('{') => {
            let snapshot: ChainSnapshot =
                serde_json::from_str(&content).with_context(parse_context)?;
            Ok(LoadedChain {
                declared_length: Some(snapshot.length),
                blocks: snapshot.chain,
            })
        }
        _ => bail!(
            "failed to parse chain file: {}: expected a {{length, chain}} object or an array of blocks",
            path.display()
        ),
    }
}

/// Read a single exported block.
pub fn load_block(path: &Path) -> Result<Block> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read block file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse block file: {}", path.display()))
}
