use crate::types::DbId;

/// Domain error taxonomy shared by every layer.
///
/// Storage failures are deliberately absent: they stay `sqlx::Error` and are
/// reported by the API layer as a generic infrastructure error.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A bulk request referenced ids that do not all resolve.
    #[error("Entities not found: requested {expected} {entity} records, found {found}")]
    NotFoundMany {
        entity: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Confirmation token not found")]
    UnknownToken,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A lifecycle precondition does not hold (inactive employee, item not available, ...).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Already returned: {0}")]
    AlreadyReturned(String),

    /// An issue protocol was requested before the holder confirmed receipt.
    #[error("Confirmation required: {employee} has not confirmed receipt of this issuance")]
    ConfirmationRequired { employee: String },

    #[error("Expired: {0}")]
    Expired(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
