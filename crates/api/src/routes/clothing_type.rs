use axum::routing::get;
use axum::Router;

use crate::handlers::clothing_type;
use crate::state::AppState;

/// Clothing type routes mounted at `/clothing-types`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(clothing_type::list).post(clothing_type::create))
        .route(
            "/{id}",
            get(clothing_type::get_by_id)
                .put(clothing_type::update)
                .delete(clothing_type::delete),
        )
}
