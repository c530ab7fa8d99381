//! # textrace-ledger — Append-Only Hash-Chain Ledger
//!
//! Records every batch mutation (creation, stage update, ownership transfer,
//! archival) as one block in a SHA-256 linked chain, and proves after the
//! fact that no block was altered or reordered.
//!
//! ## Data Model
//!
//! - [`Transaction`]: closed tagged union over the four supply-chain events.
//! - [`Block`]: one transaction plus `index`, `timestamp`, `previousHash`,
//!   `nonce` (always 0) and `hash`, the digest of all other fields.
//! - [`HashChainLedger`]: the process-wide chain, injected as a shared
//!   `Arc` handle by the composition root.
//!
//! ## Integrity Model
//!
//! ```text
//! block[i].hash         == sha256(JCS({index, timestamp, transaction, previousHash, nonce}))
//! block[i].previousHash == block[i-1].hash        (block[0].previousHash == "0")
//! ```
//!
//! [`verify_blocks`] re-derives both properties over a whole chain and
//! reports the first failing block.
//!
//! ## Concurrency
//!
//! `append` reads the last block and pushes the next one under a single
//! write lock, so concurrent appends can never claim the same index or
//! `previousHash`. Reads take a shared lock and observe a consistent chain.

pub mod block;
pub mod error;
pub mod ledger;
pub mod transaction;
pub mod verify;

pub use block::{Block, BlockReceipt, GENESIS_PREVIOUS_HASH};
pub use error::LedgerError;
pub use ledger::{ChainSnapshot, HashChainLedger, LedgerStats};
pub use transaction::{
    ArchiveBatch, CreateBatch, Transaction, TransactionKind, TransferOwnership, UpdateStage,
};
pub use verify::{verify_blocks, Verification, VerificationReport};
