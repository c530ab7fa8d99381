//! # Route Modules
//!
//! Each module defines an Axum router for one API surface area. They are
//! assembled, with middleware, in [`crate::app`].

pub mod batches;
pub mod health;
pub mod ledger;
