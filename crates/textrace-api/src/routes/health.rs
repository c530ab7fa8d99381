//! # Service Health Report
//!
//! `GET /api/health` summarizes the API counters, chain integrity and batch
//! totals in one document. The plain liveness/readiness checks are mounted
//! in [`crate::app`].

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use textrace_core::Timestamp;
use utoipa::ToSchema;

use crate::registry::BatchCounts;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Always `UP` when the handler runs.
    pub status: String,
    pub requests_served: u64,
    pub errors: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainHealth {
    pub chain_valid: bool,
    pub total_blocks: u64,
    /// `UP` for a valid chain, `DEGRADED` otherwise.
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub api: ApiHealth,
    pub blockchain: ChainHealth,
    pub batches: BatchCounts,
    #[schema(value_type = String)]
    pub timestamp: Timestamp,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Health report", body = HealthReport)),
    tag = "health"
)]
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let stats = state.ledger.stats();
    Json(HealthReport {
        api: ApiHealth {
            status: "UP".to_string(),
            requests_served: state.metrics.requests(),
            errors: state.metrics.errors(),
        },
        blockchain: ChainHealth {
            chain_valid: stats.chain_valid,
            total_blocks: stats.total_blocks,
            status: if stats.chain_valid { "UP" } else { "DEGRADED" }.to_string(),
        },
        batches: state.batches.counts(),
        timestamp: Timestamp::now(),
    })
}
