use axum::routing::{get, post};
use axum::Router;

use crate::handlers::confirmation;
use crate::state::AppState;

/// Confirmation routes mounted at `/confirmations`.
///
/// ```text
/// GET    /                   -> list
/// GET    /{id}               -> get_by_id
/// POST   /{id}/resend        -> resend
/// GET    /{id}/protocol      -> protocol
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(confirmation::list))
        .route("/{id}", get(confirmation::get_by_id))
        .route("/{id}/resend", post(confirmation::resend))
        .route("/{id}/protocol", get(confirmation::protocol))
}
