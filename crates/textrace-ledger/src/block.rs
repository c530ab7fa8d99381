//! # Blocks and Receipts
//!
//! A [`Block`] wraps exactly one [`Transaction`] and is immutable once
//! appended. Its `hash` is the SHA-256 digest of the JCS canonical form of
//! every other field, so any edit to a stored block is detectable by
//! recomputing [`Block::compute_hash`].

use serde::{Deserialize, Serialize};
use textrace_core::{sha256_hex, CanonicalBytes, CanonicalizationError, Timestamp};

use crate::transaction::Transaction;

/// `previousHash` of the genesis block (index 0).
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// One hash-linked record in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Block {
    /// Position in the chain, starting at 0.
    pub index: u64,
    /// When the block was appended (not caller-supplied).
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2026-01-15T12:00:00.000Z"))]
    pub timestamp: Timestamp,
    /// The recorded domain event.
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub transaction: Transaction,
    /// `hash` of the preceding block, or `"0"` for genesis.
    pub previous_hash: String,
    /// SHA-256 hex digest of the other fields.
    pub hash: String,
    /// Always 0; there is no proof-of-work.
    pub nonce: u64,
}

/// The fields covered by a block hash, borrowed from a [`Block`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockContent<'a> {
    index: u64,
    timestamp: &'a Timestamp,
    transaction: &'a Transaction,
    previous_hash: &'a str,
    nonce: u64,
}

impl Block {
    /// Build a block and compute its hash.
    pub fn seal(
        index: u64,
        timestamp: Timestamp,
        transaction: Transaction,
        previous_hash: String,
    ) -> Result<Self, CanonicalizationError> {
        let mut block = Self {
            index,
            timestamp,
            transaction,
            previous_hash,
            hash: String::new(),
            nonce: 0,
        };
        block.hash = block.compute_hash()?;
        Ok(block)
    }

    /// Recompute the digest over `{index, timestamp, transaction, previousHash, nonce}`.
    ///
    /// Uses the stored timestamp, never the wall clock.
    pub fn compute_hash(&self) -> Result<String, CanonicalizationError> {
        let content = BlockContent {
            index: self.index,
            timestamp: &self.timestamp,
            transaction: &self.transaction,
            previous_hash: &self.previous_hash,
            nonce: self.nonce,
        };
        Ok(sha256_hex(&CanonicalBytes::new(&content)?))
    }

    /// Whether the stored hash matches a fresh recomputation.
    pub fn hash_is_valid(&self) -> bool {
        matches!(self.compute_hash(), Ok(h) if h == self.hash)
    }

    /// Whether this is the first block of a chain.
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

/// What a caller keeps as its reference into the ledger after an append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BlockReceipt {
    pub block_index: u64,
    /// Equal to the block hash.
    pub transaction_hash: String,
    pub previous_hash: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub timestamp: Timestamp,
    /// Always `true`.
    pub immutable: bool,
}

impl From<&Block> for BlockReceipt {
    fn from(block: &Block) -> Self {
        Self {
            block_index: block.index,
            transaction_hash: block.hash.clone(),
            previous_hash: block.previous_hash.clone(),
            timestamp: block.timestamp,
            immutable: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textrace_core::{BatchId, PartyName, Stage};

    fn fixed(ts: &str) -> Timestamp {
        Timestamp::parse(ts).unwrap()
    }

    fn genesis() -> Block {
        let tx = Transaction::CreateBatch(crate::transaction::CreateBatch {
            batch_id: BatchId::new("COT-001").unwrap(),
            owner: PartyName::new("Ayesha Farms").unwrap(),
            stage: Stage::RawCotton,
            location: PartyName::new("Multan").unwrap(),
            variety: PartyName::new("Desi").unwrap(),
            timestamp: fixed("2026-01-15T11:59:59.500Z"),
        });
        Block::seal(
            0,
            fixed("2026-01-15T12:00:00.000Z"),
            tx,
            GENESIS_PREVIOUS_HASH.to_string(),
        )
        .unwrap()
    }

    #[test]
    fn seal_sets_hash_and_zero_nonce() {
        let block = genesis();
        assert_eq!(block.nonce, 0);
        assert_eq!(block.hash.len(), 64);
        assert!(block.hash_is_valid());
        assert!(block.is_genesis());
    }

    const GENESIS_VECTOR_HASH: &str = "64b5898ef86d656f4f1994704f8b09be43b8556243ab79f3683ac210a9c7779e";

    #[test]
    fn known_digest_vector() {
        // sha256 of the JCS form:
        // {"index":0,"nonce":0,"previousHash":"0","timestamp":"2026-01-15T12:00:00.000Z",
        //  "transaction":{"batchId":"COT-001","location":"Multan","owner":"Ayesha Farms",
        //  "stage":"RAW_COTTON","timestamp":"2026-01-15T11:59:59.500Z","type":"CREATE_BATCH","variety":"Desi"}}
        assert_eq!(genesis().hash, GENESIS_VECTOR_HASH);
    }

    #[test]
    fn hash_excludes_hash_field() {
        let mut block = genesis();
        let original = block.compute_hash().unwrap();
        block.hash = "f".repeat(64);
        assert_eq!(block.compute_hash().unwrap(), original);
    }

    #[test]
    fn every_covered_field_changes_the_hash() {
        let base = genesis();

        let mut b = base.clone();
        b.index = 1;
        assert_ne!(b.compute_hash().unwrap(), base.hash);

        let mut b = base.clone();
        b.timestamp = fixed("2026-01-15T12:00:00.001Z");
        assert_ne!(b.compute_hash().unwrap(), base.hash);

        let mut b = base.clone();
        b.previous_hash = "1".to_string();
        assert_ne!(b.compute_hash().unwrap(), base.hash);

        let mut b = base.clone();
        b.nonce = 7;
        assert_ne!(b.compute_hash().unwrap(), base.hash);

        let mut b = base.clone();
        if let Transaction::CreateBatch(tx) = &mut b.transaction {
            tx.variety = PartyName::new("Pima").unwrap();
        }
        assert_ne!(b.compute_hash().unwrap(), base.hash);
    }

    #[test]
    fn block_json_is_camel_case_and_roundtrips_hash() {
        let block = genesis();
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["previousHash"], "0");
        assert_eq!(json["transaction"]["type"], "CREATE_BATCH");

        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
        assert!(back.hash_is_valid());
    }

    #[test]
    fn receipt_projects_block() {
        let block = genesis();
        let receipt = BlockReceipt::from(&block);
        assert_eq!(receipt.block_index, 0);
        assert_eq!(receipt.transaction_hash, block.hash);
        assert_eq!(receipt.previous_hash, "0");
        assert_eq!(receipt.timestamp, block.timestamp);
        assert!(receipt.immutable);

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["blockIndex"], 0);
        assert_eq!(json["immutable"], true);
        assert!(json.get("transactionHash").is_some());
    }
}
