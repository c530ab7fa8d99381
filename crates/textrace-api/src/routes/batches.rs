//! # Batch API
//!
//! Batch lifecycle routes. Every lifecycle mutation is recorded on the
//! ledger and answers with the updated batch plus the block receipt.
//!
//! ## Endpoints
//!
//! Public, served by [`public_router`]:
//!
//! - `GET /api/batch/{id}`: one batch with its history
//! - `GET /api/batch/stats/summary`: batch count and stage distribution
//!
//! Token-protected, served by [`router`]:
//!
//! - `POST /api/batch`: register a batch at `RAW_COTTON`
//! - `GET /api/batch`: list batches (`?showArchived=true` to include archived)
//! - `PUT /api/batch/{id}`: stage/location update or ownership transfer
//! - `PUT /api/batch/{id}/archive`: toggle the archive flag
//! - `POST /api/batch/{id}/documents`: file a document fingerprint

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use textrace_core::{BatchId, ContentDigest, PartyName, Stage};
use textrace_ledger::BlockReceipt;
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::registry::{
    BatchDocument, BatchMutation, BatchRecord, BatchSummary, BatchUpdate, NewBatch, NewDocument,
};
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchRequest {
    #[schema(example = "COT-001")]
    pub batch_id: String,
    pub owner: String,
    pub location: String,
    pub variety: String,
}

impl Validate for CreateBatchRequest {
    type Validated = NewBatch;

    fn validate(self) -> Result<NewBatch, AppError> {
        Ok(NewBatch {
            batch_id: BatchId::new(self.batch_id)?,
            owner: PartyName::for_field("owner", self.owner)?,
            location: PartyName::for_field("location", self.location)?,
            variety: PartyName::for_field("variety", self.variety)?,
        })
    }
}

/// Blank optional fields are treated as absent.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatchRequest {
    #[schema(example = "GINNED")]
    pub stage: Option<String>,
    pub location: Option<String>,
    /// The party performing the update.
    pub handler: String,
    /// Set to transfer ownership instead of recording a stage update.
    pub new_owner: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Validate for UpdateBatchRequest {
    type Validated = BatchUpdate;

    fn validate(self) -> Result<BatchUpdate, AppError> {
        Ok(BatchUpdate {
            stage: present(self.stage)
                .map(|s| s.trim().parse::<Stage>())
                .transpose()?,
            location: present(self.location)
                .map(|l| PartyName::for_field("location", l))
                .transpose()?,
            handler: PartyName::for_field("handler", self.handler)?,
            new_owner: present(self.new_owner)
                .map(|o| PartyName::for_field("newOwner", o))
                .transpose()?,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListBatchesQuery {
    /// Include archived batches.
    #[serde(default)]
    pub show_archived: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResponse {
    /// `Batch archived` or `Batch unarchived`.
    pub message: String,
    pub batch: BatchRecord,
    /// Present only when archiving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_record: Option<BlockReceipt>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachDocumentRequest {
    #[schema(example = "ginning-certificate.pdf")]
    pub filename: String,
    /// Hex SHA-256 of the document bytes, computed by the client.
    pub file_hash: String,
}

impl Validate for AttachDocumentRequest {
    type Validated = NewDocument;

    fn validate(self) -> Result<NewDocument, AppError> {
        Ok(NewDocument {
            filename: PartyName::for_field("filename", self.filename)?,
            file_hash: ContentDigest::from_hex(self.file_hash.trim())?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    /// Always `Document recorded`.
    pub message: String,
    pub document: BatchDocument,
    pub batch: BatchRecord,
}

// ── Router ──────────────────────────────────────────────────────────

/// Read-only batch routes served without a token.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/batch/stats/summary", get(batch_summary))
        .route("/api/batch/{id}", get(get_batch))
}

/// Routes that sit behind the auth middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/batch", get(list_batches).post(create_batch))
        .route("/api/batch/{id}", put(update_batch))
        .route("/api/batch/{id}/archive", put(archive_batch))
        .route("/api/batch/{id}/documents", post(attach_document))
}

/// A path id that fails validation names no stored batch.
fn batch_id(raw: &str) -> Result<BatchId, AppError> {
    BatchId::new(raw).map_err(|_| AppError::NotFound(format!("batch {raw} not found")))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /api/batch
#[utoipa::path(
    post,
    path = "/api/batch",
    request_body = CreateBatchRequest,
    responses(
        (status = 201, description = "Batch created and recorded", body = BatchMutation),
        (status = 409, description = "Batch already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "batches"
)]
pub(crate) async fn create_batch(
    State(state): State<AppState>,
    body: Result<Json<CreateBatchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BatchMutation>), AppError> {
    let input = extract_validated_json(body)?;
    let created = state.batches.create(input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/batch
#[utoipa::path(
    get,
    path = "/api/batch",
    params(ListBatchesQuery),
    responses((status = 200, description = "Batches, newest first", body = Vec<BatchRecord>)),
    tag = "batches"
)]
pub(crate) async fn list_batches(
    State(state): State<AppState>,
    Query(query): Query<ListBatchesQuery>,
) -> Json<Vec<BatchRecord>> {
    Json(state.batches.list(query.show_archived))
}

/// GET /api/batch/{id}
#[utoipa::path(
    get,
    path = "/api/batch/{id}",
    params(("id" = String, Path, description = "Batch id")),
    responses(
        (status = 200, description = "Batch found", body = BatchRecord),
        (status = 404, description = "Batch not found", body = crate::error::ErrorBody),
    ),
    tag = "batches"
)]
pub(crate) async fn get_batch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BatchRecord>, AppError> {
    let id = batch_id(&id)?;
    state
        .batches
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("batch {id} not found")))
}

/// PUT /api/batch/{id}
#[utoipa::path(
    put,
    path = "/api/batch/{id}",
    params(("id" = String, Path, description = "Batch id")),
    request_body = UpdateBatchRequest,
    responses(
        (status = 200, description = "Batch updated and recorded", body = BatchMutation),
        (status = 404, description = "Batch not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "batches"
)]
pub(crate) async fn update_batch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateBatchRequest>, JsonRejection>,
) -> Result<Json<BatchMutation>, AppError> {
    let id = batch_id(&id)?;
    let update = extract_validated_json(body)?;
    Ok(Json(state.batches.update(&id, update)?))
}

/// PUT /api/batch/{id}/archive
#[utoipa::path(
    put,
    path = "/api/batch/{id}/archive",
    params(("id" = String, Path, description = "Batch id")),
    responses(
        (status = 200, description = "Archive flag toggled", body = ArchiveResponse),
        (status = 404, description = "Batch not found", body = crate::error::ErrorBody),
    ),
    tag = "batches"
)]
pub(crate) async fn archive_batch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArchiveResponse>, AppError> {
    let id = batch_id(&id)?;
    let BatchMutation {
        batch,
        blockchain_record,
    } = state.batches.toggle_archive(&id)?;

    let message = if batch.is_archived {
        "Batch archived"
    } else {
        "Batch unarchived"
    };
    Ok(Json(ArchiveResponse {
        message: message.to_string(),
        batch,
        blockchain_record,
    }))
}

/// POST /api/batch/{id}/documents
#[utoipa::path(
    post,
    path = "/api/batch/{id}/documents",
    params(("id" = String, Path, description = "Batch id")),
    request_body = AttachDocumentRequest,
    responses(
        (status = 200, description = "Fingerprint stored on the batch", body = DocumentResponse),
        (status = 404, description = "Batch not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "batches"
)]
pub(crate) async fn attach_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<AttachDocumentRequest>, JsonRejection>,
) -> Result<Json<DocumentResponse>, AppError> {
    let id = batch_id(&id)?;
    let input = extract_validated_json(body)?;
    let (document, batch) = state.batches.attach_document(&id, input)?;
    Ok(Json(DocumentResponse {
        message: "Document recorded".to_string(),
        document,
        batch,
    }))
}

/// GET /api/batch/stats/summary
#[utoipa::path(
    get,
    path = "/api/batch/stats/summary",
    responses((status = 200, description = "Batch totals by stage", body = BatchSummary)),
    tag = "batches"
)]
pub(crate) async fn batch_summary(State(state): State<AppState>) -> Json<BatchSummary> {
    Json(state.batches.summary())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_validates_every_field() {
        let ok = CreateBatchRequest {
            batch_id: " COT-001 ".into(),
            owner: "Ayesha Farms".into(),
            location: "Multan".into(),
            variety: "Desi".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.batch_id.as_str(), "COT-001");

        let err = CreateBatchRequest {
            batch_id: "COT-001".into(),
            owner: "Ayesha Farms".into(),
            location: "Multan".into(),
            variety: "   ".into(),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("variety")), "{err}");
    }

    #[test]
    fn update_request_blank_fields_are_absent() {
        let update = UpdateBatchRequest {
            stage: Some("".into()),
            location: Some("  ".into()),
            handler: "Rashid".into(),
            new_owner: None,
        }
        .validate()
        .unwrap();
        assert!(update.stage.is_none());
        assert!(update.location.is_none());
    }

    #[test]
    fn update_request_rejects_unknown_stage() {
        let err = UpdateBatchRequest {
            stage: Some("MELTED".into()),
            location: None,
            handler: "Rashid".into(),
            new_owner: None,
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("MELTED")), "{err}");
    }

    #[test]
    fn update_request_requires_handler() {
        let err = UpdateBatchRequest {
            stage: Some("GINNED".into()),
            location: None,
            handler: "".into(),
            new_owner: None,
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("handler")), "{err}");
    }

    #[test]
    fn document_request_checks_hash_and_filename() {
        let ok = AttachDocumentRequest {
            filename: "ginning-certificate.pdf".into(),
            file_hash: "AB".repeat(32),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.file_hash.to_hex(), "ab".repeat(32));

        let err = AttachDocumentRequest {
            filename: "cert.pdf".into(),
            file_hash: "not-a-hash".into(),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("SHA-256")), "{err}");

        let err = AttachDocumentRequest {
            filename: " ".into(),
            file_hash: "0".repeat(64),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("filename")), "{err}");
    }

    #[test]
    fn malformed_path_id_is_not_found() {
        assert!(matches!(batch_id("no/such id"), Err(AppError::NotFound(_))));
        assert!(batch_id("COT-001").is_ok());
    }
}
