pub mod clothing_type;
pub mod confirmation;
pub mod employee;
pub mod health;
pub mod item;
pub mod public;
pub mod transaction;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /employees                                       list
/// /employees/{id}                                  get
/// /employees/{id}/items                            items currently held
///
/// /clothing-types                                  list, create
/// /clothing-types/{id}                             get, update, delete
///
/// /items                                           list (filters), create
/// /items/by-qr/{qr_code}                           lookup by QR token
/// /items/{id}                                      get, update, delete (admin)
/// /items/{id}/retire                               retire (POST)
/// /items/{id}/mark-lost                            mark lost (POST, admin)
/// /items/{id}/history                              audit trail
///
/// /transactions                                    list (filters)
/// /transactions/{id}                               get
/// /transactions/issue                              issue one item (POST)
/// /transactions/issue/bulk                         issue several items (POST)
/// /transactions/{id}/return                        return one (POST)
/// /transactions/return/bulk                        uniform bulk return (POST)
/// /transactions/return/bulk-individual             per-item bulk return (POST)
/// /transactions/{id}/protocol/{kind}               issue|return protocol
/// /transactions/protocol/bulk-return               bulk return protocol (POST)
///
/// /confirmations                                   list
/// /confirmations/{id}                              get
/// /confirmations/{id}/resend                       resend email (POST)
/// /confirmations/{id}/protocol                     cached protocol
///
/// /public/confirm/{token}                          confirm receipt (no auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/employees", employee::router())
        .nest("/clothing-types", clothing_type::router())
        .nest("/items", item::router())
        .nest("/transactions", transaction::router())
        .nest("/confirmations", confirmation::router())
        // Links from confirmation emails.
        .nest("/public", public::router())
}
