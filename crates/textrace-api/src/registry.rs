//! # Batch Registry
//!
//! The in-memory batch store. Every lifecycle mutation appends one
//! transaction to the shared [`HashChainLedger`] and records the returned
//! receipt in the batch's history. Document fingerprints are kept on the
//! batch record only; they are not ledger events.
//!
//! The registry write lock is held across the ledger append, so two
//! mutations of the registry can never reach the chain in a different
//! order than they reach the batch histories. The ledger is appended to
//! before the record changes: a rejected transaction leaves the batch
//! untouched.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use textrace_core::{BatchId, ContentDigest, PartyName, Stage, Timestamp};
use textrace_ledger::{BlockReceipt, HashChainLedger, LedgerError, Transaction};
use thiserror::Error;
use utoipa::ToSchema;

/// Errors from registry mutations.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("batch {0} not found")]
    NotFound(BatchId),

    #[error("batch {0} already exists")]
    AlreadyExists(BatchId),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// One recorded step in a batch's life, pointing at its block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[schema(value_type = String)]
    pub stage: Stage,
    /// The party that performed the step.
    #[schema(value_type = String)]
    pub owner: PartyName,
    #[schema(value_type = String)]
    pub location: PartyName,
    #[schema(value_type = String)]
    pub timestamp: Timestamp,
    pub block_index: u64,
    pub transaction_hash: String,
}

impl HistoryEntry {
    fn new(stage: Stage, owner: PartyName, location: PartyName, receipt: &BlockReceipt) -> Self {
        Self {
            stage,
            owner,
            location,
            timestamp: receipt.timestamp,
            block_index: receipt.block_index,
            transaction_hash: receipt.transaction_hash.clone(),
        }
    }
}

/// SHA-256 fingerprint of a document filed against a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchDocument {
    #[schema(value_type = String, example = "ginning-certificate.pdf")]
    pub filename: PartyName,
    /// Lowercase hex SHA-256 of the document bytes.
    pub file_hash: String,
    #[schema(value_type = String)]
    pub timestamp: Timestamp,
}

/// A textile batch as held by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    #[schema(value_type = String, example = "COT-001")]
    pub batch_id: BatchId,
    #[schema(value_type = String)]
    pub current_owner: PartyName,
    #[schema(value_type = String, example = "RAW_COTTON")]
    pub stage: Stage,
    #[schema(value_type = String)]
    pub location: PartyName,
    #[schema(value_type = String)]
    pub variety: PartyName,
    pub is_archived: bool,
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub documents: Vec<BatchDocument>,
    #[schema(value_type = String)]
    pub created_at: Timestamp,
    #[schema(value_type = String)]
    pub updated_at: Timestamp,
}

/// Validated input for [`BatchRegistry::create`].
#[derive(Debug, Clone)]
pub struct NewBatch {
    pub batch_id: BatchId,
    pub owner: PartyName,
    pub location: PartyName,
    pub variety: PartyName,
}

/// Validated input for [`BatchRegistry::update`].
///
/// With `new_owner` set the update is recorded as an ownership transfer,
/// otherwise as a stage update.
#[derive(Debug, Clone)]
pub struct BatchUpdate {
    pub stage: Option<Stage>,
    pub location: Option<PartyName>,
    pub handler: PartyName,
    pub new_owner: Option<PartyName>,
}

/// Validated input for [`BatchRegistry::attach_document`].
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: PartyName,
    pub file_hash: ContentDigest,
}

/// A batch after a mutation, with the receipt of the block that recorded it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchMutation {
    pub batch: BatchRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_record: Option<BlockReceipt>,
}

/// Batch counts for the health report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BatchCounts {
    pub total: u64,
    pub archived: u64,
}

/// Number of batches currently at one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StageCount {
    #[schema(value_type = String)]
    pub stage: Stage,
    pub count: u64,
}

/// Network summary served by `GET /api/batch/stats/summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_units: u64,
    pub archived_units: u64,
    /// Every stage in processing order, archived batches included.
    pub stage_distribution: Vec<StageCount>,
}

/// Thread-safe, cloneable batch store bound to one ledger.
#[derive(Debug, Clone)]
pub struct BatchRegistry {
    batches: Arc<RwLock<HashMap<BatchId, BatchRecord>>>,
    ledger: Arc<HashChainLedger>,
}

impl BatchRegistry {
    pub fn new(ledger: Arc<HashChainLedger>) -> Self {
        Self {
            batches: Arc::new(RwLock::new(HashMap::new())),
            ledger,
        }
    }

    /// Register a batch at the initial stage and record `CREATE_BATCH`.
    pub fn create(&self, input: NewBatch) -> Result<BatchMutation, RegistryError> {
        let mut batches = self.batches.write();
        if batches.contains_key(&input.batch_id) {
            return Err(RegistryError::AlreadyExists(input.batch_id));
        }

        let stage = Stage::initial();
        let receipt = self.ledger.append(Transaction::create_batch(
            input.batch_id.clone(),
            input.owner.clone(),
            stage,
            input.location.clone(),
            input.variety.clone(),
        ))?;

        let record = BatchRecord {
            batch_id: input.batch_id.clone(),
            current_owner: input.owner.clone(),
            stage,
            location: input.location.clone(),
            variety: input.variety,
            is_archived: false,
            history: vec![HistoryEntry::new(stage, input.owner, input.location, &receipt)],
            documents: Vec::new(),
            created_at: receipt.timestamp,
            updated_at: receipt.timestamp,
        };
        batches.insert(input.batch_id, record.clone());

        Ok(BatchMutation {
            batch: record,
            blockchain_record: Some(receipt),
        })
    }

    /// Move a batch to a new stage or location, or hand it to a new owner.
    pub fn update(&self, id: &BatchId, update: BatchUpdate) -> Result<BatchMutation, RegistryError> {
        let mut batches = self.batches.write();
        let record = batches
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        let stage = update.stage.unwrap_or(record.stage);
        let location = update.location.unwrap_or_else(|| record.location.clone());

        let transaction = match &update.new_owner {
            Some(new_owner) => Transaction::transfer_ownership(
                id.clone(),
                record.current_owner.clone(),
                new_owner.clone(),
            ),
            None => Transaction::update_stage(
                id.clone(),
                stage,
                location.clone(),
                update.handler.clone(),
            ),
        };
        let receipt = self.ledger.append(transaction)?;

        if let Some(new_owner) = update.new_owner {
            record.current_owner = new_owner;
        }
        record.stage = stage;
        record.location = location.clone();
        record.updated_at = receipt.timestamp;
        record
            .history
            .push(HistoryEntry::new(stage, update.handler, location, &receipt));

        Ok(BatchMutation {
            batch: record.clone(),
            blockchain_record: Some(receipt),
        })
    }

    /// Flip the archive flag. `ARCHIVE_BATCH` is recorded only when archiving.
    pub fn toggle_archive(&self, id: &BatchId) -> Result<BatchMutation, RegistryError> {
        let mut batches = self.batches.write();
        let record = batches
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        let receipt = if record.is_archived {
            None
        } else {
            Some(self.ledger.append(Transaction::archive_batch(id.clone()))?)
        };

        record.is_archived = !record.is_archived;
        record.updated_at = receipt
            .as_ref()
            .map(|r| r.timestamp)
            .unwrap_or_else(Timestamp::now);

        Ok(BatchMutation {
            batch: record.clone(),
            blockchain_record: receipt,
        })
    }

    /// File a document fingerprint against a batch.
    pub fn attach_document(
        &self,
        id: &BatchId,
        input: NewDocument,
    ) -> Result<(BatchDocument, BatchRecord), RegistryError> {
        let mut batches = self.batches.write();
        let record = batches
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        let document = BatchDocument {
            filename: input.filename,
            file_hash: input.file_hash.to_hex(),
            timestamp: Timestamp::now(),
        };
        tracing::info!(
            batch_id = %id,
            filename = %document.filename,
            file_hash = %document.file_hash,
            "document fingerprint recorded"
        );
        record.documents.push(document.clone());
        record.updated_at = document.timestamp;

        Ok((document, record.clone()))
    }

    pub fn get(&self, id: &BatchId) -> Option<BatchRecord> {
        self.batches.read().get(id).cloned()
    }

    /// Batches newest first; archived ones only when asked for.
    pub fn list(&self, include_archived: bool) -> Vec<BatchRecord> {
        let mut out: Vec<BatchRecord> = self
            .batches
            .read()
            .values()
            .filter(|b| include_archived || !b.is_archived)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.batch_id.cmp(&b.batch_id))
        });
        out
    }

    pub fn counts(&self) -> BatchCounts {
        let batches = self.batches.read();
        BatchCounts {
            total: batches.len() as u64,
            archived: batches.values().filter(|b| b.is_archived).count() as u64,
        }
    }

    pub fn summary(&self) -> BatchSummary {
        let batches = self.batches.read();
        let stage_distribution = Stage::all()
            .iter()
            .map(|&stage| StageCount {
                stage,
                count: batches.values().filter(|b| b.stage == stage).count() as u64,
            })
            .collect();
        BatchSummary {
            total_units: batches.len() as u64,
            archived_units: batches.values().filter(|b| b.is_archived).count() as u64,
            stage_distribution,
        }
    }

    /// The ledger this registry records into.
    pub fn ledger(&self) -> &Arc<HashChainLedger> {
        &self.ledger
    }
}
