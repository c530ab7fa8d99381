//! Errors raised at the ledger's append boundary.

use textrace_core::CanonicalizationError;
use thiserror::Error;

/// Errors returned by [`HashChainLedger::append`](crate::HashChainLedger::append).
///
/// Verification failures are not errors; they are reported as a
/// [`Verification`](crate::Verification) value.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The transaction violates a cross-field rule and was not appended.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// The block content could not be canonicalized for hashing.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}
