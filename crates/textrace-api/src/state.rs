//! # Application State
//!
//! Shared state passed to every handler via the `State` extractor. The
//! composition root builds exactly one [`HashChainLedger`] and hands the
//! same `Arc` to the batch registry and the ledger read routes.

use std::sync::Arc;

use textrace_ledger::HashChainLedger;
use thiserror::Error;

use crate::middleware::metrics::ApiMetrics;
use crate::registry::BatchRegistry;

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 5000;

/// Configuration errors detected at startup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
}

/// Service configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Bearer token for batch routes. `None` disables authentication.
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            auth_token: None,
        }
    }
}

impl AppConfig {
    /// Read `PORT` and `AUTH_TOKEN` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            auth_token: get("AUTH_TOKEN"),
        })
    }
}

/// Application state. Cloning shares the ledger, registry and counters.
#[derive(Debug, Clone)]
pub struct AppState {
    pub ledger: Arc<HashChainLedger>,
    pub batches: BatchRegistry,
    pub metrics: ApiMetrics,
    pub config: AppConfig,
}

impl AppState {
    /// State with default configuration and an empty ledger.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let ledger = Arc::new(HashChainLedger::new());
        Self {
            batches: BatchRegistry::new(Arc::clone(&ledger)),
            ledger,
            metrics: ApiMetrics::new(),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
