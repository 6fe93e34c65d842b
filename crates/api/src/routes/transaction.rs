use axum::routing::{get, post};
use axum::Router;

use crate::handlers::transaction;
use crate::state::AppState;

/// Ledger routes mounted at `/transactions`.
///
/// ```text
/// GET    /                           -> list
/// GET    /{id}                       -> get_by_id
/// POST   /issue                      -> issue
/// POST   /issue/bulk                 -> issue_bulk
/// POST   /{id}/return                -> return_single
/// POST   /return/bulk                -> return_bulk
/// POST   /return/bulk-individual     -> return_bulk_individual
/// GET    /{id}/protocol/{kind}       -> protocol
/// POST   /protocol/bulk-return       -> bulk_return_protocol
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(transaction::list))
        .route("/{id}", get(transaction::get_by_id))
        .route("/issue", post(transaction::issue))
        .route("/issue/bulk", post(transaction::issue_bulk))
        .route("/{id}/return", post(transaction::return_single))
        .route("/return/bulk", post(transaction::return_bulk))
        .route(
            "/return/bulk-individual",
            post(transaction::return_bulk_individual),
        )
        .route("/{id}/protocol/{kind}", get(transaction::protocol))
        .route(
            "/protocol/bulk-return",
            post(transaction::bulk_return_protocol),
        )
}
