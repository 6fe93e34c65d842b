use axum::routing::get;
use axum::Router;

use crate::handlers::employee;
use crate::state::AppState;

/// Employee routes mounted at `/employees`.
///
/// ```text
/// GET    /               -> list
/// GET    /{id}           -> get_by_id
/// GET    /{id}/items     -> held_items
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(employee::list))
        .route("/{id}", get(employee::get_by_id))
        .route("/{id}/items", get(employee::held_items))
}
