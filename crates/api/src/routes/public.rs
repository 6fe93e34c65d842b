use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Unauthenticated routes mounted at `/public`.
///
/// ```text
/// GET    /confirm/{token}    -> confirm
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/confirm/{token}", get(public::confirm))
}
