//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement, so authorization is visible in handler signatures.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use workwear_core::error::CoreError;
use workwear_core::roles::{can_read_people, can_write_inventory, ROLE_ADMIN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `ADMIN` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires a role allowed to issue, return, and edit inventory.
pub struct RequireInventoryWrite(pub AuthUser);

impl FromRequestParts<AppState> for RequireInventoryWrite {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_write_inventory(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin or Warehouse role required".into(),
            )));
        }
        Ok(RequireInventoryWrite(user))
    }
}

/// Requires a role allowed to see per-employee confirmation records.
pub struct RequirePeopleRead(pub AuthUser);

impl FromRequestParts<AppState> for RequirePeopleRead {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_read_people(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin, Warehouse, or HR role required".into(),
            )));
        }
        Ok(RequirePeopleRead(user))
    }
}

/// Requires any authenticated employee (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for route
/// definitions where "this route requires authentication" should read as such.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
