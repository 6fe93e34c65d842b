//! Handlers for the `/confirmations` resource (staff side).

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use workwear_core::types::DbId;
use workwear_db::models::confirmation::ConfirmationFilter;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireInventoryWrite, RequirePeopleRead};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/confirmations?employee_id=&confirmed=
pub async fn list(
    _auth: RequirePeopleRead,
    State(state): State<AppState>,
    Query(filter): Query<ConfirmationFilter>,
) -> AppResult<impl IntoResponse> {
    let confirmations = state.confirmations.list(&filter).await?;
    Ok(Json(DataResponse {
        data: confirmations,
    }))
}

/// GET /api/v1/confirmations/{id}
pub async fn get_by_id(
    _auth: RequirePeopleRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let confirmation = state.confirmations.find(id).await?;
    Ok(Json(DataResponse { data: confirmation }))
}

/// POST /api/v1/confirmations/{id}/resend
///
/// 409 once confirmed, 410 once expired.
pub async fn resend(
    RequireInventoryWrite(user): RequireInventoryWrite,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let summary = state.workflow.resend(id).await?;
    tracing::info!(confirmation_id = id, user_id = user.user_id, "Confirmation resend requested");
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/confirmations/{id}/protocol
pub async fn protocol(
    _auth: RequirePeopleRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.protocols.confirmation_protocol(id).await
}
