use axum::routing::{get, post};
use axum::Router;

use crate::handlers::item;
use crate::state::AppState;

/// Item routes mounted at `/items`.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> create
/// GET    /by-qr/{qr_code}    -> get_by_qr_code
/// GET    /{id}               -> get_by_id
/// PUT    /{id}               -> update
/// DELETE /{id}               -> delete (admin only)
/// POST   /{id}/retire        -> retire
/// POST   /{id}/mark-lost     -> mark_lost (admin only)
/// GET    /{id}/history       -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(item::list).post(item::create))
        .route("/by-qr/{qr_code}", get(item::get_by_qr_code))
        .route(
            "/{id}",
            get(item::get_by_id).put(item::update).delete(item::delete),
        )
        .route("/{id}/retire", post(item::retire))
        .route("/{id}/mark-lost", post(item::mark_lost))
        .route("/{id}/history", get(item::history))
}
