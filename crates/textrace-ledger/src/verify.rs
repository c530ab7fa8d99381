//! # Chain Verification
//!
//! A full re-scan of a chain that reports the first block violating either
//! half of the integrity model:
//!
//! 1. **Content**: the stored `hash` no longer equals the digest recomputed
//!    from the block's own fields ("has been tampered with").
//! 2. **Linkage**: `previousHash` no longer equals the preceding block's
//!    `hash`, or the block sits at the wrong position ("is not properly
//!    linked").
//!
//! The genesis block is held to the same rules, with the `"0"` sentinel as
//! its expected `previousHash`. Verification is O(n) and keeps no state
//! between calls.

use serde::{Deserialize, Serialize};

use crate::block::{Block, GENESIS_PREVIOUS_HASH};

/// Outcome of verifying a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "VerificationReport")]
pub enum Verification {
    /// Every block's content and link checked out.
    Valid { total_blocks: u64 },
    /// The block's stored hash does not match its content.
    Tampered { block_index: u64 },
    /// The block does not point at its predecessor.
    Unlinked { block_index: u64 },
}

impl Verification {
    /// Whether the chain passed verification.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Index of the first failing block, if any.
    pub fn block_index(&self) -> Option<u64> {
        match self {
            Self::Valid { .. } => None,
            Self::Tampered { block_index } | Self::Unlinked { block_index } => Some(*block_index),
        }
    }

    /// Human-readable verdict.
    pub fn message(&self) -> String {
        match self {
            Self::Valid { .. } => "Blockchain is valid and immutable".to_string(),
            Self::Tampered { block_index } => format!("Block {block_index} has been tampered with"),
            Self::Unlinked { block_index } => format!("Block {block_index} is not properly linked"),
        }
    }
}

/// Wire form of a [`Verification`]:
/// `{ valid, message, blockIndex?, totalBlocks? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub valid: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_blocks: Option<u64>,
}

impl From<Verification> for VerificationReport {
    fn from(v: Verification) -> Self {
        Self {
            valid: v.is_valid(),
            message: v.message(),
            block_index: v.block_index(),
            total_blocks: match v {
                Verification::Valid { total_blocks } => Some(total_blocks),
                _ => None,
            },
        }
    }
}

/// Verify an ordered chain of blocks.
///
/// Returns on the first failure. An empty chain is valid.
pub fn verify_blocks(blocks: &[Block]) -> Verification {
    for (position, block) in blocks.iter().enumerate() {
        let i = position as u64;

        if !block.hash_is_valid() {
            return Verification::Tampered { block_index: i };
        }

        let expected_previous = match position {
            0 => GENESIS_PREVIOUS_HASH,
            _ => blocks[position - 1].hash.as_str(),
        };
        if block.index != i || block.previous_hash != expected_previous {
            return Verification::Unlinked { block_index: i };
        }
    }

    Verification::Valid {
        total_blocks: blocks.len() as u64,
    }
}
