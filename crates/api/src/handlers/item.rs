//! Handlers for the `/items` resource.
//!
//! Reads go to [`ClothingItemRepo`]; edits, retirement, loss, and deletion go
//! through [`InventoryCatalog`](crate::lifecycle::InventoryCatalog) so they
//! are locked and audited.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use workwear_core::error::CoreError;
use workwear_core::types::DbId;
use workwear_db::models::audit::entity_types;
use workwear_db::models::clothing_item::{
    CreateClothingItem, ItemFilter, MarkLostRequest, RetireItemRequest, UpdateClothingItem,
};
use workwear_db::repositories::{AuditRepo, ClothingItemRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireInventoryWrite, RequirePeopleRead};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/items?status=&holder_id=&clothing_type_id=
pub async fn list(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> AppResult<impl IntoResponse> {
    let items = ClothingItemRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/items/{id}
pub async fn get_by_id(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = ClothingItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ClothingItem",
            id,
        }))?;
    Ok(Json(DataResponse { data: item }))
}

/// GET /api/v1/items/by-qr/{qr_code}
pub async fn get_by_qr_code(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Path(qr_code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let item = ClothingItemRepo::find_by_qr_code(&state.pool, &qr_code)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
    Ok(Json(DataResponse { data: item }))
}

/// GET /api/v1/items/{id}/history
///
/// Audit trail of one item, oldest first.
pub async fn history(
    _auth: RequirePeopleRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entries = AuditRepo::list_for_entity(&state.pool, entity_types::CLOTHING_ITEM, id).await?;
    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// Administration
// ---------------------------------------------------------------------------

/// POST /api/v1/items
pub async fn create(
    RequireInventoryWrite(user): RequireInventoryWrite,
    State(state): State<AppState>,
    Json(input): Json<CreateClothingItem>,
) -> AppResult<impl IntoResponse> {
    let item = state.catalog.create_item(&input, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/items/{id}
pub async fn update(
    RequireInventoryWrite(user): RequireInventoryWrite,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClothingItem>,
) -> AppResult<impl IntoResponse> {
    let item = state.catalog.update_item(id, &input, user.user_id).await?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/items/{id}/retire
pub async fn retire(
    RequireInventoryWrite(user): RequireInventoryWrite,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RetireItemRequest>,
) -> AppResult<impl IntoResponse> {
    let item = state.catalog.retire_item(id, &input, user.user_id).await?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/items/{id}/mark-lost
///
/// Administrative override from any non-terminal status.
pub async fn mark_lost(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MarkLostRequest>,
) -> AppResult<impl IntoResponse> {
    let item = state.catalog.mark_item_lost(id, &input, admin.user_id).await?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/items/{id}
///
/// Permanent delete of a retired, never-issued item.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.catalog.delete_item(id, admin.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
