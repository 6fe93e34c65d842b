//! Handlers for the `/transactions` resource: the ledger, issue and return,
//! and protocol downloads.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use workwear_core::error::CoreError;
use workwear_core::types::DbId;
use workwear_db::models::transaction::{
    BulkIndividualReturnRequest, BulkIssueRequest, BulkProtocolRequest, BulkReturnRequest,
    IssueRequest, ReturnRequest, TransactionDetail, TransactionFilter,
};
use workwear_db::repositories::TransactionRepo;

use crate::error::{AppError, AppResult};
use crate::lifecycle::ConfirmationSummary;
use crate::middleware::rbac::{RequireAuth, RequireInventoryWrite};
use crate::protocols::ProtocolKind;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body of `POST /transactions/issue`.
#[derive(Debug, Serialize)]
pub struct IssueResponse {
    pub transaction: TransactionDetail,
    /// `None` when the follow-on confirmation could not be created.
    pub confirmation: Option<ConfirmationSummary>,
}

/// Response body of `POST /transactions/issue/bulk`.
#[derive(Debug, Serialize)]
pub struct BulkIssueResponse {
    pub transactions: Vec<TransactionDetail>,
    pub confirmation: Option<ConfirmationSummary>,
}

// ---------------------------------------------------------------------------
// Ledger reads
// ---------------------------------------------------------------------------

/// GET /api/v1/transactions?employee_id=&item_id=&open=
pub async fn list(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<TransactionFilter>,
) -> AppResult<impl IntoResponse> {
    let transactions = TransactionRepo::list_details(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: transactions }))
}

/// GET /api/v1/transactions/{id}
pub async fn get_by_id(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transaction = TransactionRepo::find_detail_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Transaction",
            id,
        }))?;
    Ok(Json(DataResponse { data: transaction }))
}

// ---------------------------------------------------------------------------
// Issue
// ---------------------------------------------------------------------------

/// POST /api/v1/transactions/issue
///
/// Commits the issuance first; the confirmation email that follows cannot
/// fail the request.
pub async fn issue(
    RequireInventoryWrite(user): RequireInventoryWrite,
    State(state): State<AppState>,
    Json(input): Json<IssueRequest>,
) -> AppResult<impl IntoResponse> {
    let transaction = state.issuance.issue_single(&input, user.user_id).await?;
    let confirmation = state
        .workflow
        .after_issue(std::slice::from_ref(&transaction))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: IssueResponse {
                transaction,
                confirmation,
            },
        }),
    ))
}

/// POST /api/v1/transactions/issue/bulk
pub async fn issue_bulk(
    RequireInventoryWrite(user): RequireInventoryWrite,
    State(state): State<AppState>,
    Json(input): Json<BulkIssueRequest>,
) -> AppResult<impl IntoResponse> {
    let transactions = state.issuance.issue_bulk(&input, user.user_id).await?;
    let confirmation = state.workflow.after_issue(&transactions).await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: BulkIssueResponse {
                transactions,
                confirmation,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// Return
// ---------------------------------------------------------------------------

/// POST /api/v1/transactions/{id}/return
pub async fn return_single(
    RequireInventoryWrite(user): RequireInventoryWrite,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReturnRequest>,
) -> AppResult<impl IntoResponse> {
    let transaction = state
        .issuance
        .return_single(id, &input, user.user_id)
        .await?;
    Ok(Json(DataResponse { data: transaction }))
}

/// POST /api/v1/transactions/return/bulk
pub async fn return_bulk(
    RequireInventoryWrite(user): RequireInventoryWrite,
    State(state): State<AppState>,
    Json(input): Json<BulkReturnRequest>,
) -> AppResult<impl IntoResponse> {
    let transactions = state
        .issuance
        .return_bulk_uniform(&input, user.user_id)
        .await?;
    Ok(Json(DataResponse { data: transactions }))
}

/// POST /api/v1/transactions/return/bulk-individual
pub async fn return_bulk_individual(
    RequireInventoryWrite(user): RequireInventoryWrite,
    State(state): State<AppState>,
    Json(input): Json<BulkIndividualReturnRequest>,
) -> AppResult<impl IntoResponse> {
    let transactions = state
        .issuance
        .return_bulk_individual(&input, user.user_id)
        .await?;
    Ok(Json(DataResponse { data: transactions }))
}

// ---------------------------------------------------------------------------
// Protocols
// ---------------------------------------------------------------------------

/// GET /api/v1/transactions/{id}/protocol/{kind}
///
/// `kind` is `issue` or `return`. The issue protocol answers 403 until the
/// holder has confirmed receipt.
pub async fn protocol(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Path((id, kind)): Path<(DbId, ProtocolKind)>,
) -> AppResult<impl IntoResponse> {
    state.protocols.transaction_protocol(id, kind).await
}

/// POST /api/v1/transactions/protocol/bulk-return
pub async fn bulk_return_protocol(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<BulkProtocolRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .protocols
        .bulk_return_protocol(&input.transaction_ids)
        .await
}
