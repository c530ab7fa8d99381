//! # Ledger Read API
//!
//! Read-only views of the hash chain. These routes never append.
//!
//! - `GET /api/blockchain/stats`: block count, validity, latest block
//! - `GET /api/blockchain/chain`: every block in order
//! - `GET /api/blockchain/verify`: full re-verification

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use textrace_ledger::{ChainSnapshot, LedgerStats, Verification, VerificationReport};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/blockchain/stats", get(stats))
        .route("/api/blockchain/chain", get(chain))
        .route("/api/blockchain/verify", get(verify))
}

/// GET /api/blockchain/stats
#[utoipa::path(
    get,
    path = "/api/blockchain/stats",
    responses((status = 200, description = "Chain summary", body = LedgerStats)),
    tag = "blockchain"
)]
pub(crate) async fn stats(State(state): State<AppState>) -> Json<LedgerStats> {
    Json(state.ledger.stats())
}

/// GET /api/blockchain/chain
#[utoipa::path(
    get,
    path = "/api/blockchain/chain",
    responses((status = 200, description = "Full chain", body = ChainSnapshot)),
    tag = "blockchain"
)]
pub(crate) async fn chain(State(state): State<AppState>) -> Json<ChainSnapshot> {
    Json(ChainSnapshot::from(state.ledger.as_ref()))
}

/// GET /api/blockchain/verify
///
/// Always 200: a corrupt chain is a result, not an error.
#[utoipa::path(
    get,
    path = "/api/blockchain/verify",
    responses((status = 200, description = "Verification result", body = VerificationReport)),
    tag = "blockchain"
)]
pub(crate) async fn verify(State(state): State<AppState>) -> Json<Verification> {
    Json(state.ledger.verify())
}
