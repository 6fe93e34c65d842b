//! Ledger transaction model, joined detail view, and lifecycle request bodies.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workwear_core::inventory::ItemCondition;
use workwear_core::types::{DbId, Timestamp};

/// A row from the `transactions` table: one issue cycle of one item.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: DbId,
    pub employee_id: DbId,
    pub item_id: DbId,
    pub transaction_type: String,
    pub issued_at: Timestamp,
    pub issued_by_id: DbId,
    pub condition_on_issue: String,
    pub returned_at: Option<Timestamp>,
    pub returned_by_id: Option<DbId>,
    pub condition_on_return: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Transaction {
    /// A returned transaction is terminal.
    pub fn is_returned(&self) -> bool {
        self.returned_at.is_some()
    }
}

/// A transaction joined with its employee, item, clothing type, and issuer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TransactionDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub transaction: Transaction,
    pub employee_first_name: String,
    pub employee_last_name: String,
    pub employee_email: String,
    pub item_internal_id: String,
    pub item_size: String,
    pub item_category: String,
    pub item_status: String,
    pub item_condition: String,
    pub clothing_type_id: DbId,
    pub clothing_type_name: String,
    pub clothing_type_image_url: Option<String>,
    pub issued_by_name: String,
    pub returned_by_name: Option<String>,
}

impl TransactionDetail {
    pub fn employee_name(&self) -> String {
        format!("{} {}", self.employee_first_name, self.employee_last_name)
    }
}

/// Repository input for a new ISSUE row.
#[derive(Debug, Clone)]
pub struct CreateIssue<'a> {
    pub employee_id: DbId,
    pub item_id: DbId,
    pub issued_by_id: DbId,
    pub condition_on_issue: ItemCondition,
    pub notes: Option<&'a str>,
}

/// Repository input closing an issue cycle. `notes` is the full, already
/// concatenated note text.
#[derive(Debug, Clone)]
pub struct RecordReturn {
    pub returned_by_id: DbId,
    pub condition_on_return: ItemCondition,
    pub notes: Option<String>,
}

/// Query-string filters for listing transactions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    pub employee_id: Option<DbId>,
    pub item_id: Option<DbId>,
    /// `true` for open issue cycles only, `false` for returned ones only.
    pub open: Option<bool>,
}

/// Request body for `POST /transactions/issue`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRequest {
    pub employee_id: DbId,
    pub item_id: DbId,
    pub condition_on_issue: ItemCondition,
    pub notes: Option<String>,
}

/// Request body for `POST /transactions/issue/bulk`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkIssueRequest {
    pub employee_id: DbId,
    pub item_ids: Vec<DbId>,
    pub condition_on_issue: ItemCondition,
    pub notes: Option<String>,
}

/// Request body for `POST /transactions/{id}/return`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnRequest {
    pub condition_on_return: ItemCondition,
    pub notes: Option<String>,
}

/// Request body for `POST /transactions/return/bulk` (one shared condition).
#[derive(Debug, Clone, Deserialize)]
pub struct BulkReturnRequest {
    pub transaction_ids: Vec<DbId>,
    pub condition_on_return: ItemCondition,
    pub notes: Option<String>,
}

/// One row of an individual bulk return.
#[derive(Debug, Clone, Deserialize)]
pub struct IndividualReturn {
    pub transaction_id: DbId,
    pub condition_on_return: ItemCondition,
    pub notes: Option<String>,
}

/// Request body for `POST /transactions/return/bulk-individual`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkIndividualReturnRequest {
    pub items: Vec<IndividualReturn>,
    pub general_notes: Option<String>,
}

/// Request body for `POST /transactions/protocol/bulk-return`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkProtocolRequest {
    pub transaction_ids: Vec<DbId>,
}
