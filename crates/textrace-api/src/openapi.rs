//! # OpenAPI Document
//!
//! Assembles the utoipa-annotated handlers into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "textrace API",
        description = "Textile batch provenance backed by an append-only SHA-256 hash chain.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::health::health,
        crate::routes::ledger::stats,
        crate::routes::ledger::chain,
        crate::routes::ledger::verify,
        crate::routes::batches::create_batch,
        crate::routes::batches::list_batches,
        crate::routes::batches::get_batch,
        crate::routes::batches::update_batch,
        crate::routes::batches::archive_batch,
        crate::routes::batches::attach_document,
        crate::routes::batches::batch_summary,
    ),
    components(schemas(
        textrace_ledger::Block,
        textrace_ledger::BlockReceipt,
        textrace_ledger::LedgerStats,
        textrace_ledger::ChainSnapshot,
        textrace_ledger::VerificationReport,
        crate::registry::BatchRecord,
        crate::registry::HistoryEntry,
        crate::registry::BatchMutation,
        crate::registry::BatchCounts,
        crate::registry::BatchDocument,
        crate::registry::BatchSummary,
        crate::registry::StageCount,
        crate::routes::batches::CreateBatchRequest,
        crate::routes::batches::UpdateBatchRequest,
        crate::routes::batches::ArchiveResponse,
        crate::routes::batches::AttachDocumentRequest,
        crate::routes::batches::DocumentResponse,
        crate::routes::health::HealthReport,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "blockchain", description = "Read-only hash-chain ledger"),
        (name = "batches", description = "Batch lifecycle, recorded on the ledger"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for path in [
            "/api/health",
            "/api/blockchain/stats",
            "/api/blockchain/chain",
            "/api/blockchain/verify",
            "/api/batch",
            "/api/batch/{id}",
            "/api/batch/{id}/archive",
            "/api/batch/{id}/documents",
            "/api/batch/stats/summary",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(doc["components"]["schemas"].get("Block").is_some());
    }
}
