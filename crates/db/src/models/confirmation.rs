//! Confirmation model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workwear_core::confirmation::{self, ItemsSnapshot, ProtocolType};
use workwear_core::error::CoreError;
use workwear_core::types::{DbId, Timestamp};

/// A row from the `confirmations` table.
///
/// The token is only ever sent to the employee; it is never serialized into
/// API responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Confirmation {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub token: String,
    pub employee_id: DbId,
    pub protocol_type: String,
    pub items_json: serde_json::Value,
    pub confirmed: bool,
    pub confirmed_at: Option<Timestamp>,
    pub expires_at: Timestamp,
    pub protocol_file_path: Option<String>,
    pub email_sent: bool,
    pub email_sent_at: Option<Timestamp>,
    pub email_error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Confirmation {
    pub fn snapshot(&self) -> Result<ItemsSnapshot, CoreError> {
        ItemsSnapshot::from_value(&self.items_json)
    }

    pub fn protocol_type(&self) -> Result<ProtocolType, CoreError> {
        self.protocol_type.parse()
    }

    /// True iff `transaction_id` is in the stored transaction id list.
    ///
    /// A malformed snapshot covers nothing. The `items_json @>` predicate in
    /// `ConfirmationRepo` expresses the same rule in SQL.
    pub fn belongs_to(&self, transaction_id: DbId) -> bool {
        self.snapshot()
            .map(|s| s.belongs_to(transaction_id))
            .unwrap_or(false)
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        confirmation::is_expired(self.expires_at, now)
    }
}

/// Repository input for a new confirmation.
#[derive(Debug, Clone)]
pub struct CreateConfirmation {
    pub token: String,
    pub employee_id: DbId,
    pub protocol_type: ProtocolType,
    pub items_json: serde_json::Value,
    pub expires_at: Timestamp,
}

/// Query-string filters for listing confirmations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmationFilter {
    pub employee_id: Option<DbId>,
    pub confirmed: Option<bool>,
}
