//! Lifecycle services.
//!
//! Each service owns a pool and runs every multi-row mutation inside one
//! database transaction, re-checking its preconditions against rows locked
//! with `SELECT ... FOR UPDATE`. Held in [`AppState`](crate::state::AppState)
//! behind `Arc`.
//!
//! - [`IssuanceOrchestrator`]: issue and return, single and bulk.
//! - [`InventoryCatalog`]: create, edit, retire, mark lost, delete items.
//! - [`ConfirmationEngine`]: token issuance, confirm, and the protocol gate.
//! - [`IssueWorkflow`]: confirmation plus email after a committed issue.

pub mod catalog;
pub mod confirmation;
pub mod issuance;
pub mod workflow;

pub use catalog::InventoryCatalog;
pub use confirmation::{ConfirmOutcome, ConfirmationEngine};
pub use issuance::IssuanceOrchestrator;
pub use workflow::{ConfirmationSummary, IssueWorkflow};

use sqlx::PgConnection;
use workwear_core::audit::{AuditChange, ItemField};
use workwear_core::error::CoreError;
use workwear_core::types::DbId;
use workwear_db::models::audit::CreateAuditLog;
use workwear_db::models::clothing_item::ClothingItem;
use workwear_db::models::employee::Employee;
use workwear_db::repositories::{ClothingItemRepo, EmployeeRepo};

use crate::error::{AppError, AppResult};

/// Load an employee or fail with 404.
pub(crate) async fn require_employee(conn: &mut PgConnection, id: DbId) -> AppResult<Employee> {
    EmployeeRepo::find_by_id(&mut *conn, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id,
        }))
}

/// Load an employee who may receive items.
pub(crate) async fn require_active_employee(
    conn: &mut PgConnection,
    id: DbId,
) -> AppResult<Employee> {
    let employee = require_employee(conn, id).await?;
    if !employee.is_active() {
        return Err(AppError::Core(CoreError::InvalidState(format!(
            "Employee {} is not active (current status: {})",
            employee.display_with_email(),
            employee.status
        ))));
    }
    Ok(employee)
}

/// Lock one item row for the rest of the transaction.
pub(crate) async fn lock_item(conn: &mut PgConnection, id: DbId) -> AppResult<ClothingItem> {
    ClothingItemRepo::lock_by_ids(conn, &[id])
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ClothingItem",
            id,
        }))
}

/// Add one change per item field that differs between `before` and `after`.
pub(crate) fn with_item_changes(
    entry: CreateAuditLog,
    before: &ClothingItem,
    after: &ClothingItem,
) -> CreateAuditLog {
    entry
        .change(AuditChange::item(
            ItemField::Status,
            Some(&before.status),
            Some(&after.status),
        ))
        .change(AuditChange::item(
            ItemField::Condition,
            Some(&before.condition),
            Some(&after.condition),
        ))
        .change(AuditChange::item(
            ItemField::CurrentHolder,
            before.current_holder_id,
            after.current_holder_id,
        ))
        .change(AuditChange::item(
            ItemField::Size,
            Some(&before.size),
            Some(&after.size),
        ))
        .change(AuditChange::item(
            ItemField::ClothingType,
            Some(before.clothing_type_id),
            Some(after.clothing_type_id),
        ))
        .change(AuditChange::item(
            ItemField::Category,
            Some(&before.category),
            Some(&after.category),
        ))
        .change(AuditChange::item(
            ItemField::PersonalizedFor,
            before.personalized_for_id,
            after.personalized_for_id,
        ))
        .change(AuditChange::item(
            ItemField::RetirementReason,
            before.retirement_reason.as_deref(),
            after.retirement_reason.as_deref(),
        ))
}
