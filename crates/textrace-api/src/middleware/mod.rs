//! # Middleware
//!
//! Request counters and the tracing layer. Authentication lives in
//! [`crate::auth`].

pub mod metrics;
pub mod tracing_layer;
