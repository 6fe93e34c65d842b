//! Unauthenticated endpoints reached from links in emails.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use workwear_core::confirmation::{ProtocolType, SnapshotItem};
use workwear_core::types::{DbId, Timestamp};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// What the employee sees after following the link.
#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub confirmation_id: DbId,
    pub protocol_type: ProtocolType,
    pub confirmed_at: Option<Timestamp>,
    /// `true` when the link had been used before.
    pub already_confirmed: bool,
    pub items: Vec<SnapshotItem>,
}

/// GET /api/v1/public/confirm/{token}
///
/// 404 for an unknown token, 410 once expired. Repeated confirms succeed.
pub async fn confirm(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.confirmations.confirm(&token).await?;
    let confirmation = outcome.confirmation;

    if outcome.newly_confirmed {
        state.protocols.cache_after_confirm(&confirmation).await;
    }

    let snapshot = confirmation.snapshot()?;
    Ok(Json(DataResponse {
        data: ConfirmResponse {
            confirmation_id: confirmation.id,
            protocol_type: confirmation.protocol_type()?,
            confirmed_at: confirmation.confirmed_at,
            already_confirmed: !outcome.newly_confirmed,
            items: snapshot.items,
        },
    }))
}
