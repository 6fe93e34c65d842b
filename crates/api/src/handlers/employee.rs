//! Handlers for the `/employees` resource (read-only mirror of the
//! identity provider).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use workwear_core::error::CoreError;
use workwear_core::types::DbId;
use workwear_db::repositories::{ClothingItemRepo, EmployeeRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/employees
pub async fn list(
    _auth: RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let employees = EmployeeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: employees }))
}

/// GET /api/v1/employees/{id}
pub async fn get_by_id(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let employee = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id,
        }))?;
    Ok(Json(DataResponse { data: employee }))
}

/// GET /api/v1/employees/{id}/items
///
/// Items the employee currently holds.
pub async fn held_items(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id,
        }))?;
    let items = ClothingItemRepo::list_by_holder(&state.pool, id).await?;
    Ok(Json(DataResponse { data: items }))
}
