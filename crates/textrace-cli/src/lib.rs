//! # textrace-cli — Offline Chain Tools
//!
//! Works on chains exported from `GET /api/blockchain/chain`, without a
//! running service.
//!
//! ## Subcommands
//!
//! - `verify`: re-verify every block of an exported chain
//! - `stats`: summarize an exported chain
//! - `digest`: recompute the hash of one exported block
//!
//! ## Exit Codes
//!
//! - `0`: success, chain or block intact
//! - `1`: the input could not be read or parsed
//! - `2`: the chain or block failed verification
//!
//! Handlers take their output sink as a parameter and return the exit code;
//! argument parsing lives in `main.rs`.

pub mod digest;
pub mod snapshot;
pub mod stats;
pub mod verify;

/// Input was intact.
pub const EXIT_OK: u8 = 0;
/// Input was read but failed verification.
pub const EXIT_CORRUPT: u8 = 2;
