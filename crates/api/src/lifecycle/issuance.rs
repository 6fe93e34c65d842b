//! Issue and return orchestration.
//!
//! Issuing moves an AVAILABLE item to PENDING for an employee and opens a
//! ledger row. Returning closes the open row and puts the item back to
//! AVAILABLE with the condition observed on return. Bulk variants are
//! all-or-nothing: every precondition is checked before the first write, and
//! any error drops the database transaction.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use workwear_core::audit::{AuditAction, AuditChange, TransactionField};
use workwear_core::error::CoreError;
use workwear_core::inventory::{ItemAction, ItemCondition, ItemStatus};
use workwear_core::ledger;
use workwear_core::types::DbId;
use workwear_db::models::audit::{entity_types, CreateAuditLog};
use workwear_db::models::clothing_item::ClothingItem;
use workwear_db::models::employee::Employee;
use workwear_db::models::transaction::{
    BulkIndividualReturnRequest, BulkIssueRequest, BulkReturnRequest, CreateIssue, IssueRequest,
    RecordReturn, ReturnRequest, Transaction, TransactionDetail,
};
use workwear_db::repositories::{AuditRepo, ClothingItemRepo, TransactionRepo};

use super::{lock_item, require_active_employee, require_employee, with_item_changes};
use crate::error::{AppError, AppResult};

/// How the notes of one returned row are built.
#[derive(Debug, Clone, Copy)]
enum ReturnNotes<'a> {
    /// Single and uniform bulk returns.
    Uniform(Option<&'a str>),
    /// Individual bulk returns: batch-wide notes, then per-item notes.
    Individual {
        general: Option<&'a str>,
        item: Option<&'a str>,
    },
}

impl ReturnNotes<'_> {
    fn apply(self, existing: Option<&str>) -> Option<String> {
        match self {
            Self::Uniform(notes) => ledger::return_notes(existing, notes),
            Self::Individual { general, item } => {
                ledger::individual_return_notes(existing, general, item)
            }
        }
    }
}

/// One transaction to close.
#[derive(Debug, Clone, Copy)]
struct ReturnLine<'a> {
    transaction_id: DbId,
    condition: ItemCondition,
    notes: ReturnNotes<'a>,
}

/// Runs issue and return operations against the ledger and item table.
pub struct IssuanceOrchestrator {
    pool: PgPool,
}

impl IssuanceOrchestrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // -----------------------------------------------------------------------
    // Issue
    // -----------------------------------------------------------------------

    /// Issue one AVAILABLE item to an active employee.
    pub async fn issue_single(
        &self,
        input: &IssueRequest,
        issuer_id: DbId,
    ) -> AppResult<TransactionDetail> {
        let mut tx = self.pool.begin().await?;

        let employee = require_active_employee(&mut *tx, input.employee_id).await?;
        require_employee(&mut *tx, issuer_id).await?;

        let item = lock_item(&mut *tx, input.item_id).await?;
        let status = item.status()?;
        if status.apply(ItemAction::Issue).is_none() {
            return Err(AppError::Core(CoreError::InvalidState(format!(
                "Item {} is not available (current status: {status})",
                item.internal_id
            ))));
        }

        let transaction = open_issue(
            &mut *tx,
            &employee,
            &item,
            issuer_id,
            input.condition_on_issue,
            input.notes.as_deref(),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = transaction.id,
            item_id = item.id,
            employee_id = employee.id,
            "Item issued",
        );

        self.detail(transaction.id).await
    }

    /// Issue several AVAILABLE items to one employee, all or nothing.
    ///
    /// Transactions are created in request order.
    pub async fn issue_bulk(
        &self,
        input: &BulkIssueRequest,
        issuer_id: DbId,
    ) -> AppResult<Vec<TransactionDetail>> {
        ledger::validate_bulk_ids(&input.item_ids, "item").map_err(CoreError::Validation)?;

        let mut tx = self.pool.begin().await?;

        let employee = require_active_employee(&mut *tx, input.employee_id).await?;
        require_employee(&mut *tx, issuer_id).await?;

        let locked = ClothingItemRepo::lock_by_ids(&mut *tx, &input.item_ids).await?;
        if locked.len() != input.item_ids.len() {
            return Err(AppError::Core(CoreError::NotFoundMany {
                entity: "ClothingItem",
                expected: input.item_ids.len(),
                found: locked.len(),
            }));
        }
        let mut by_id: HashMap<DbId, ClothingItem> =
            locked.into_iter().map(|item| (item.id, item)).collect();

        let mut items = Vec::with_capacity(input.item_ids.len());
        for id in &input.item_ids {
            let item = by_id.remove(id).ok_or(AppError::Core(CoreError::NotFound {
                entity: "ClothingItem",
                id: *id,
            }))?;
            items.push(item);
        }

        let mut unavailable = Vec::new();
        for item in &items {
            let status = item.status()?;
            if status.apply(ItemAction::Issue).is_none() {
                unavailable.push((item.internal_id.clone(), status));
            }
        }
        if !unavailable.is_empty() {
            return Err(AppError::Core(CoreError::InvalidState(
                ledger::unavailable_items_message(&unavailable),
            )));
        }

        let mut transaction_ids = Vec::with_capacity(items.len());
        for item in &items {
            let transaction = open_issue(
                &mut *tx,
                &employee,
                item,
                issuer_id,
                input.condition_on_issue,
                input.notes.as_deref(),
            )
            .await?;
            transaction_ids.push(transaction.id);
        }

        tx.commit().await?;

        tracing::info!(
            count = transaction_ids.len(),
            employee_id = employee.id,
            "Bulk issue completed",
        );

        self.details(&transaction_ids).await
    }

    // -----------------------------------------------------------------------
    // Return
    // -----------------------------------------------------------------------

    /// Close one open transaction.
    pub async fn return_single(
        &self,
        transaction_id: DbId,
        input: &ReturnRequest,
        returner_id: DbId,
    ) -> AppResult<TransactionDetail> {
        let line = ReturnLine {
            transaction_id,
            condition: input.condition_on_return,
            notes: ReturnNotes::Uniform(input.notes.as_deref()),
        };
        self.return_batch(&[line], returner_id).await?;
        self.detail(transaction_id).await
    }

    /// Close several transactions with one shared condition and note.
    pub async fn return_bulk_uniform(
        &self,
        input: &BulkReturnRequest,
        returner_id: DbId,
    ) -> AppResult<Vec<TransactionDetail>> {
        ledger::validate_bulk_ids(&input.transaction_ids, "transaction")
            .map_err(CoreError::Validation)?;

        let lines: Vec<ReturnLine<'_>> = input
            .transaction_ids
            .iter()
            .map(|&transaction_id| ReturnLine {
                transaction_id,
                condition: input.condition_on_return,
                notes: ReturnNotes::Uniform(input.notes.as_deref()),
            })
            .collect();

        let ids = self.return_batch(&lines, returner_id).await?;
        self.details(&ids).await
    }

    /// Close several transactions, each with its own condition and note.
    pub async fn return_bulk_individual(
        &self,
        input: &BulkIndividualReturnRequest,
        returner_id: DbId,
    ) -> AppResult<Vec<TransactionDetail>> {
        let ids: Vec<DbId> = input.items.iter().map(|i| i.transaction_id).collect();
        ledger::validate_bulk_ids(&ids, "transaction").map_err(CoreError::Validation)?;

        let lines: Vec<ReturnLine<'_>> = input
            .items
            .iter()
            .map(|row| ReturnLine {
                transaction_id: row.transaction_id,
                condition: row.condition_on_return,
                notes: ReturnNotes::Individual {
                    general: input.general_notes.as_deref(),
                    item: row.notes.as_deref(),
                },
            })
            .collect();

        let ids = self.return_batch(&lines, returner_id).await?;
        self.details(&ids).await
    }

    /// Validate and close every line in one database transaction.
    ///
    /// Lock order is transactions, then items, matching issue's item-only
    /// locking so the two never wait on each other in a cycle.
    async fn return_batch(
        &self,
        lines: &[ReturnLine<'_>],
        returner_id: DbId,
    ) -> AppResult<Vec<DbId>> {
        let ids: Vec<DbId> = lines.iter().map(|l| l.transaction_id).collect();

        let mut tx = self.pool.begin().await?;

        require_employee(&mut *tx, returner_id).await?;

        let locked = TransactionRepo::lock_by_ids(&mut *tx, &ids).await?;
        if locked.len() != ids.len() {
            let err = match lines {
                [single] => CoreError::NotFound {
                    entity: "Transaction",
                    id: single.transaction_id,
                },
                _ => CoreError::NotFoundMany {
                    entity: "Transaction",
                    expected: ids.len(),
                    found: locked.len(),
                },
            };
            return Err(AppError::Core(err));
        }

        let item_ids: Vec<DbId> = locked.iter().map(|t| t.item_id).collect();
        let items: HashMap<DbId, ClothingItem> = ClothingItemRepo::lock_by_ids(&mut *tx, &item_ids)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();
        let transactions: HashMap<DbId, Transaction> =
            locked.into_iter().map(|t| (t.id, t)).collect();

        let mut rows = Vec::with_capacity(lines.len());
        for line in lines {
            let transaction =
                transactions
                    .get(&line.transaction_id)
                    .ok_or(AppError::Core(CoreError::NotFound {
                        entity: "Transaction",
                        id: line.transaction_id,
                    }))?;
            let item = items
                .get(&transaction.item_id)
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "ClothingItem",
                    id: transaction.item_id,
                }))?;
            rows.push((line, transaction, item));
        }

        let already_returned: Vec<String> = rows
            .iter()
            .filter(|(_, transaction, _)| transaction.is_returned())
            .map(|(_, _, item)| item.internal_id.clone())
            .collect();
        if !already_returned.is_empty() {
            return Err(AppError::Core(CoreError::AlreadyReturned(
                ledger::already_returned_message(&already_returned),
            )));
        }

        let mut blocked = Vec::new();
        for (_, _, item) in &rows {
            let status = item.status()?;
            if status.apply(ItemAction::Return).is_none() {
                blocked.push((item.internal_id.clone(), status));
            }
        }
        if !blocked.is_empty() {
            return Err(AppError::Core(CoreError::InvalidState(
                ledger::unreturnable_items_message(&blocked),
            )));
        }

        for (line, transaction, item) in &rows {
            close_issue(&mut *tx, transaction, item, returner_id, line).await?;
        }

        tx.commit().await?;

        tracing::info!(count = ids.len(), returner_id, "Items returned");

        Ok(ids)
    }

    // -----------------------------------------------------------------------
    // Read-back
    // -----------------------------------------------------------------------

    async fn detail(&self, id: DbId) -> AppResult<TransactionDetail> {
        TransactionRepo::find_detail_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Transaction",
                id,
            }))
    }

    async fn details(&self, ids: &[DbId]) -> AppResult<Vec<TransactionDetail>> {
        Ok(TransactionRepo::find_details_by_ids(&self.pool, ids).await?)
    }
}

// ---------------------------------------------------------------------------
// Row-level writes
// ---------------------------------------------------------------------------

/// Open a ledger row and hand the item to the employee.
async fn open_issue(
    conn: &mut PgConnection,
    employee: &Employee,
    item: &ClothingItem,
    issuer_id: DbId,
    condition: ItemCondition,
    notes: Option<&str>,
) -> AppResult<Transaction> {
    let transaction = TransactionRepo::create_issue(
        &mut *conn,
        &CreateIssue {
            employee_id: employee.id,
            item_id: item.id,
            issued_by_id: issuer_id,
            condition_on_issue: condition,
            notes,
        },
    )
    .await?;

    let updated = ClothingItemRepo::set_possession(
        &mut *conn,
        item.id,
        ItemStatus::Pending,
        Some(employee.id),
        None,
    )
    .await?;

    AuditRepo::append(
        &mut *conn,
        &CreateAuditLog::new(entity_types::TRANSACTION, transaction.id, AuditAction::Issue)
            .actor(issuer_id)
            .change(AuditChange::transaction(
                TransactionField::Created,
                None,
                Some(&item.internal_id),
            )),
    )
    .await?;
    AuditRepo::append(
        &mut *conn,
        &with_item_changes(
            CreateAuditLog::new(entity_types::CLOTHING_ITEM, item.id, AuditAction::Issue)
                .actor(issuer_id),
            item,
            &updated,
        ),
    )
    .await?;

    Ok(transaction)
}

/// Close a ledger row and put the item back on the shelf.
async fn close_issue(
    conn: &mut PgConnection,
    transaction: &Transaction,
    item: &ClothingItem,
    returner_id: DbId,
    line: &ReturnLine<'_>,
) -> AppResult<Transaction> {
    let returned = TransactionRepo::record_return(
        &mut *conn,
        transaction.id,
        &RecordReturn {
            returned_by_id: returner_id,
            condition_on_return: line.condition,
            notes: line.notes.apply(transaction.notes.as_deref()),
        },
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::AlreadyReturned(ledger::already_returned_message(
            &[item.internal_id.clone()],
        )))
    })?;

    let updated = ClothingItemRepo::set_possession(
        &mut *conn,
        item.id,
        ItemStatus::Available,
        None,
        Some(line.condition),
    )
    .await?;

    AuditRepo::append(
        &mut *conn,
        &CreateAuditLog::new(entity_types::TRANSACTION, transaction.id, AuditAction::Return)
            .actor(returner_id)
            .change(AuditChange::transaction(
                TransactionField::ReturnedAt,
                None,
                returned.returned_at.map(|t| t.to_rfc3339()),
            ))
            .change(AuditChange::transaction(
                TransactionField::ConditionOnReturn,
                transaction.condition_on_return.as_deref(),
                returned.condition_on_return.as_deref(),
            ))
            .change(AuditChange::transaction(
                TransactionField::Notes,
                transaction.notes.as_deref(),
                returned.notes.as_deref(),
            )),
    )
    .await?;
    AuditRepo::append(
        &mut *conn,
        &with_item_changes(
            CreateAuditLog::new(entity_types::CLOTHING_ITEM, item.id, AuditAction::Return)
                .actor(returner_id),
            item,
            &updated,
        ),
    )
    .await?;

    Ok(returned)
}
