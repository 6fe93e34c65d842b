//! Handlers for the `/clothing-types` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use workwear_core::error::CoreError;
use workwear_core::types::DbId;
use workwear_db::models::clothing_type::{CreateClothingType, UpdateClothingType};
use workwear_db::repositories::ClothingTypeRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireInventoryWrite};
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name must not be empty".into(),
        )));
    }
    Ok(())
}

/// POST /api/v1/clothing-types
pub async fn create(
    RequireInventoryWrite(user): RequireInventoryWrite,
    State(state): State<AppState>,
    Json(input): Json<CreateClothingType>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name)?;
    let clothing_type = ClothingTypeRepo::create(&state.pool, &input).await?;

    tracing::info!(
        clothing_type_id = clothing_type.id,
        user_id = user.user_id,
        "Clothing type created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: clothing_type,
        }),
    ))
}

/// GET /api/v1/clothing-types
pub async fn list(
    _auth: RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let types = ClothingTypeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: types }))
}

/// GET /api/v1/clothing-types/{id}
pub async fn get_by_id(
    _auth: RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let clothing_type = ClothingTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ClothingType",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: clothing_type,
    }))
}

/// PUT /api/v1/clothing-types/{id}
pub async fn update(
    _auth: RequireInventoryWrite,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClothingType>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = input.name.as_deref() {
        validate_name(name)?;
    }
    let clothing_type = ClothingTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ClothingType",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: clothing_type,
    }))
}

/// DELETE /api/v1/clothing-types/{id}
///
/// Types still referenced by items are rejected by the foreign key (409).
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = ClothingTypeRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ClothingType",
            id,
        }));
    }

    tracing::info!(clothing_type_id = id, user_id = admin.user_id, "Clothing type deleted");

    Ok(StatusCode::NO_CONTENT)
}
