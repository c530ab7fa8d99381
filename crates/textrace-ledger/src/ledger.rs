//! # The Hash-Chain Ledger Service
//!
//! [`HashChainLedger`] owns the block sequence for the lifetime of the
//! process. It is constructed once by the composition root and shared as an
//! `Arc<HashChainLedger>`; there is no global instance.
//!
//! All operations are synchronous. The lock is `parking_lot::RwLock`, which
//! never poisons and is never held across an `.await`.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use textrace_core::Timestamp;

use crate::block::{Block, BlockReceipt, GENESIS_PREVIOUS_HASH};
use crate::error::LedgerError;
use crate::transaction::Transaction;
use crate::verify::{verify_blocks, Verification};

/// In-memory, append-only chain of hash-linked blocks.
#[derive(Debug, Default)]
pub struct HashChainLedger {
    blocks: RwLock<Vec<Block>>,
}

impl HashChainLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one transaction as a new block and return its receipt.
    ///
    /// Reading the tail, sealing the block and pushing it happen under a
    /// single write lock, so concurrent appends are serialized.
    pub fn append(&self, transaction: Transaction) -> Result<BlockReceipt, LedgerError> {
        transaction
            .validate()
            .map_err(LedgerError::InvalidTransaction)?;

        let kind = transaction.kind();
        let mut blocks = self.blocks.write();
        let index = blocks.len() as u64;
        let previous_hash = blocks
            .last()
            .map(|b| b.hash.clone())
            .unwrap_or_else(|| GENESIS_PREVIOUS_HASH.to_string());

        let block = Block::seal(index, Timestamp::now(), transaction, previous_hash)?;
        tracing::info!(
            index,
            kind = %kind,
            batch_id = %block.transaction.batch_id(),
            hash = %block.hash,
            "block appended"
        );

        let receipt = BlockReceipt::from(&block);
        blocks.push(block);
        Ok(receipt)
    }

    /// Re-scan the whole chain.
    pub fn verify(&self) -> Verification {
        let result = verify_blocks(&self.blocks.read());
        log_failure(&result);
        result
    }

    /// Chain summary. Verification and the latest block are taken from the
    /// same read of the chain.
    pub fn stats(&self) -> LedgerStats {
        let blocks = self.blocks.read();
        let verification = verify_blocks(&blocks);
        log_failure(&verification);
        LedgerStats {
            total_blocks: blocks.len() as u64,
            total_transactions: blocks.len() as u64,
            chain_valid: verification.is_valid(),
            latest_block: blocks.last().cloned(),
        }
    }

    /// A cloned snapshot of every block, in order.
    pub fn chain(&self) -> Vec<Block> {
        self.blocks.read().clone()
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    /// The most recently appended block.
    pub fn latest(&self) -> Option<Block> {
        self.blocks.read().last().cloned()
    }

    /// The block at `index`, if the chain is that long.
    pub fn block(&self, index: u64) -> Option<Block> {
        let index = usize::try_from(index).ok()?;
        self.blocks.read().get(index).cloned()
    }

    #[cfg(test)]
    pub(crate) fn tamper(&self, f: impl FnOnce(&mut Vec<Block>)) {
        f(&mut self.blocks.write());
    }
}

fn log_failure(verification: &Verification) {
    if let Some(block_index) = verification.block_index() {
        tracing::warn!(block_index, message = %verification.message(), "chain verification failed");
    }
}

/// Summary returned by `GET /api/blockchain/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    pub total_blocks: u64,
    /// Always equal to `total_blocks`: one transaction per block.
    pub total_transactions: u64,
    pub chain_valid: bool,
    /// `null` on an empty chain.
    pub latest_block: Option<Block>,
}

impl LedgerStats {
    /// Stats for a detached chain, such as an exported snapshot.
    pub fn of(blocks: &[Block]) -> Self {
        Self {
            total_blocks: blocks.len() as u64,
            total_transactions: blocks.len() as u64,
            chain_valid: verify_blocks(blocks).is_valid(),
            latest_block: blocks.last().cloned(),
        }
    }
}

/// The full chain as served by `GET /api/blockchain/chain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(deny_unknown_fields)]
pub struct ChainSnapshot {
    pub length: u64,
    pub chain: Vec<Block>,
}

impl ChainSnapshot {
    /// Whether the declared `length` agrees with the blocks present.
    pub fn length_matches(&self) -> bool {
        self.length == self.chain.len() as u64
    }
}

impl From<Vec<Block>> for ChainSnapshot {
    fn from(chain: Vec<Block>) -> Self {
        Self {
            length: chain.len() as u64,
            chain,
        }
    }
}

impl From<&HashChainLedger> for ChainSnapshot {
    fn from(ledger: &HashChainLedger) -> Self {
        Self::from(ledger.chain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use textrace_core::{BatchId, PartyName, Stage};

    fn id(s: &str) -> BatchId {
        BatchId::new(s).unwrap()
    }

    fn name(s: &str) -> PartyName {
        PartyName::new(s).unwrap()
    }

    fn create(batch: &str) -> Transaction {
        Transaction::create_batch(
            id(batch),
            name("Ayesha Farms"),
            Stage::RawCotton,
            name("Multan"),
            name("Desi"),
        )
    }

    fn three_block_ledger() -> HashChainLedger {
        let ledger = HashChainLedger::new();
        ledger.append(create("COT-001")).unwrap();
        ledger
            .append(Transaction::update_stage(
                id("COT-001"),
                Stage::Ginned,
                name("Multan"),
                name("Rashid Ginning"),
            ))
            .unwrap();
        ledger
            .append(Transaction::transfer_ownership(
                id("COT-001"),
                name("Ayesha Farms"),
                name("Lahore Spinners"),
            ))
            .unwrap();
        ledger
    }

    #[test]
    fn first_append_is_genesis() {
        let ledger = HashChainLedger::new();
        let receipt = ledger.append(create("COT-001")).unwrap();
        assert_eq!(receipt.block_index, 0);
        assert_eq!(receipt.previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(receipt.immutable);

        let genesis = ledger.latest().unwrap();
        assert_eq!(genesis.index, 0);
        assert_eq!(receipt.transaction_hash, genesis.hash);
        assert_eq!(ledger.verify(), Verification::Valid { total_blocks: 1 });
    }

    #[test]
    fn blocks_link_in_append_order() {
        let chain = three_block_ledger().chain();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[1].previous_hash, chain[0].hash);
        assert_eq!(chain[2].previous_hash, chain[1].hash);
        for (i, block) in chain.iter().enumerate() {
            assert_eq!(block.index, i as u64);
            assert!(block.hash_is_valid());
        }
    }

    #[test]
    fn edited_stage_is_tampering() {
        let ledger = three_block_ledger();
        ledger.tamper(|blocks| {
            if let Transaction::UpdateStage(tx) = &mut blocks[1].transaction {
                tx.stage = Stage::Dyed;
            }
        });
        let result = ledger.verify();
        assert_eq!(result, Verification::Tampered { block_index: 1 });
        assert_eq!(result.message(), "Block 1 has been tampered with");
    }

    #[test]
    fn rewritten_previous_hash_is_unlinked() {
        let ledger = three_block_ledger();
        ledger.tamper(|blocks| {
            blocks[2].previous_hash = "0".repeat(64);
            blocks[2].hash = blocks[2].compute_hash().unwrap();
        });
        let result = ledger.verify();
        assert_eq!(result, Verification::Unlinked { block_index: 2 });
        assert_eq!(result.message(), "Block 2 is not properly linked");
    }

    #[test]
    fn empty_ledger_stats() {
        let stats = HashChainLedger::new().stats();
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            serde_json::json!({
                "totalBlocks": 0,
                "totalTransactions": 0,
                "chainValid": true,
                "latestBlock": null
            })
        );
    }

    #[test]
    fn stats_track_growth_and_validity() {
        let ledger = three_block_ledger();
        let stats = ledger.stats();
        assert_eq!(stats.total_blocks, 3);
        assert_eq!(stats.total_transactions, 3);
        assert!(stats.chain_valid);
        assert_eq!(stats.latest_block.as_ref().map(|b| b.index), Some(2));

        ledger.tamper(|blocks| blocks[0].nonce = 1);
        assert!(!ledger.stats().chain_valid);
    }

    #[test]
    fn self_transfer_is_rejected_without_appending() {
        let ledger = HashChainLedger::new();
        let err = ledger
            .append(Transaction::transfer_ownership(
                id("COT-001"),
                name("Mill"),
                name("Mill"),
            ))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransaction(_)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn block_lookup() {
        let ledger = three_block_ledger();
        assert_eq!(ledger.block(1).map(|b| b.index), Some(1));
        assert!(ledger.block(3).is_none());
        assert!(ledger.block(u64::MAX).is_none());
    }

    #[test]
    fn snapshot_shape() {
        let ledger = three_block_ledger();
        let snapshot = ChainSnapshot::from(&ledger);
        assert!(snapshot.length_matches());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["length"], 3);
        assert_eq!(json["chain"][2]["index"], 2);

        let back: ChainSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(verify_blocks(&back.chain), Verification::Valid { total_blocks: 3 });
    }

    #[test]
    fn concurrent_appends_keep_the_chain_linked() {
        let ledger = Arc::new(HashChainLedger::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        ledger.append(create(&format!("B-{t}-{i}"))).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(ledger.len(), 200);
        assert_eq!(ledger.verify(), Verification::Valid { total_blocks: 200 });
    }
}
