//! # Ledger Transactions
//!
//! The four supply-chain events a block can carry. `Transaction` is an
//! internally tagged enum on the `type` field, so the wire form is
//!
//! ```json
//! {"type":"UPDATE_STAGE","batchId":"COT-001","stage":"GINNED",
//!  "location":"Multan","handler":"Rashid Ginning","timestamp":"2026-01-15T12:00:00.000Z"}
//! ```
//!
//! Unknown `type` tags, unknown payload keys and missing or empty fields
//! fail deserialization; they never reach the digest path. Each payload carries the caller's
//! domain timestamp, independent of the block timestamp set at append time.

use serde::{Deserialize, Serialize};
use textrace_core::{BatchId, PartyName, Stage, Timestamp};

/// Payload of a `CREATE_BATCH` transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateBatch {
    pub batch_id: BatchId,
    pub owner: PartyName,
    pub stage: Stage,
    pub location: PartyName,
    pub variety: PartyName,
    pub timestamp: Timestamp,
}

/// Payload of an `UPDATE_STAGE` transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateStage {
    pub batch_id: BatchId,
    pub stage: Stage,
    pub location: PartyName,
    pub handler: PartyName,
    pub timestamp: Timestamp,
}

/// Payload of a `TRANSFER_OWNERSHIP` transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransferOwnership {
    pub batch_id: BatchId,
    pub from_owner: PartyName,
    pub to_owner: PartyName,
    pub timestamp: Timestamp,
}

/// Payload of an `ARCHIVE_BATCH` transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArchiveBatch {
    pub batch_id: BatchId,
    pub timestamp: Timestamp,
}

/// One domain event recorded in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transaction {
    CreateBatch(CreateBatch),
    UpdateStage(UpdateStage),
    TransferOwnership(TransferOwnership),
    ArchiveBatch(ArchiveBatch),
}

/// Discriminant of a [`Transaction`], for logging and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    CreateBatch,
    UpdateStage,
    TransferOwnership,
    ArchiveBatch,
}

impl TransactionKind {
    /// The `type` tag used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateBatch => "CREATE_BATCH",
            Self::UpdateStage => "UPDATE_STAGE",
            Self::TransferOwnership => "TRANSFER_OWNERSHIP",
            Self::ArchiveBatch => "ARCHIVE_BATCH",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Transaction {
    /// A batch entering the chain, stamped with the current time.
    pub fn create_batch(
        batch_id: BatchId,
        owner: PartyName,
        stage: Stage,
        location: PartyName,
        variety: PartyName,
    ) -> Self {
        Self::CreateBatch(CreateBatch {
            batch_id,
            owner,
            stage,
            location,
            variety,
            timestamp: Timestamp::now(),
        })
    }

    /// A batch moving to `stage`, stamped with the current time.
    pub fn update_stage(
        batch_id: BatchId,
        stage: Stage,
        location: PartyName,
        handler: PartyName,
    ) -> Self {
        Self::UpdateStage(UpdateStage {
            batch_id,
            stage,
            location,
            handler,
            timestamp: Timestamp::now(),
        })
    }

    /// Custody of a batch passing between owners, stamped with the current time.
    pub fn transfer_ownership(batch_id: BatchId, from_owner: PartyName, to_owner: PartyName) -> Self {
        Self::TransferOwnership(TransferOwnership {
            batch_id,
            from_owner,
            to_owner,
            timestamp: Timestamp::now(),
        })
    }

    /// A batch being archived, stamped with the current time.
    pub fn archive_batch(batch_id: BatchId) -> Self {
        Self::ArchiveBatch(ArchiveBatch {
            batch_id,
            timestamp: Timestamp::now(),
        })
    }

    /// The discriminant of this transaction.
    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::CreateBatch(_) => TransactionKind::CreateBatch,
            Self::UpdateStage(_) => TransactionKind::UpdateStage,
            Self::TransferOwnership(_) => TransactionKind::TransferOwnership,
            Self::ArchiveBatch(_) => TransactionKind::ArchiveBatch,
        }
    }

    /// The batch this transaction concerns.
    pub fn batch_id(&self) -> &BatchId {
        match self {
            Self::CreateBatch(tx) => &tx.batch_id,
            Self::UpdateStage(tx) => &tx.batch_id,
            Self::TransferOwnership(tx) => &tx.batch_id,
            Self::ArchiveBatch(tx) => &tx.batch_id,
        }
    }

    /// The domain timestamp supplied by the caller.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::CreateBatch(tx) => tx.timestamp,
            Self::UpdateStage(tx) => tx.timestamp,
            Self::TransferOwnership(tx) => tx.timestamp,
            Self::ArchiveBatch(tx) => tx.timestamp,
        }
    }

    /// Check cross-field rules that the field types cannot express.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::TransferOwnership(tx) if tx.from_owner == tx.to_owner => Err(format!(
                "ownership transfer of {} must change owner (both are {:?})",
                tx.batch_id,
                tx.to_owner.as_str()
            )),
            _ => Ok(()),
        }
    }
}
