//! # textrace-core — Foundational Types
//!
//! The leaf crate of the textrace workspace. It defines the primitives that
//! every ledger record is built from, so that correctness guarantees are
//! enforced by the type system rather than by convention.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** All digest computation flows through
//!    `CanonicalBytes::new()`. Two logically equal values always produce the
//!    same bytes, so a recomputed block hash never drifts from the stored one.
//!
//! 2. **`sha256_digest()` accepts only `&CanonicalBytes`.** There is no way to
//!    hash an ad-hoc serialization of a block.
//!
//! 3. **Fixed-format timestamps.** `Timestamp` is UTC-only with millisecond
//!    precision and always renders as `YYYY-MM-DDTHH:MM:SS.sssZ`.
//!
//! 4. **Validated newtypes.** `BatchId` and `PartyName` reject empty or
//!    oversized values at construction and during deserialization.
//!
//! 5. **Single `Stage` enum.** The textile processing stages are one closed
//!    set; adding a stage forces every `match` to handle it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `textrace-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod stage;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, TextraceError, ValidationError};
pub use identity::{BatchId, PartyName};
pub use stage::Stage;
pub use temporal::Timestamp;
