//! Repository for the `transactions` ledger.
//!
//! An issue inserts a row; a return completes that same row. Rows are never
//! deleted.

use sqlx::{PgConnection, PgExecutor, PgPool};
use workwear_core::inventory::TransactionType;
use workwear_core::types::DbId;

use crate::models::transaction::{
    CreateIssue, RecordReturn, Transaction, TransactionDetail, TransactionFilter,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, employee_id, item_id, transaction_type, issued_at, issued_by_id, \
                        condition_on_issue, returned_at, returned_by_id, condition_on_return, \
                        notes, created_at, updated_at";

/// Joined projection for [`TransactionDetail`]. Expects the aliases used in
/// [`DETAIL_FROM`].
const DETAIL_COLUMNS: &str = "\
    t.id, t.employee_id, t.item_id, t.transaction_type, t.issued_at, t.issued_by_id, \
    t.condition_on_issue, t.returned_at, t.returned_by_id, t.condition_on_return, \
    t.notes, t.created_at, t.updated_at, \
    e.first_name AS employee_first_name, e.last_name AS employee_last_name, \
    e.email AS employee_email, \
    i.internal_id AS item_internal_id, i.size AS item_size, i.category AS item_category, \
    i.status AS item_status, i.condition AS item_condition, \
    ct.id AS clothing_type_id, ct.name AS clothing_type_name, \
    ct.image_url AS clothing_type_image_url, \
    ib.first_name || ' ' || ib.last_name AS issued_by_name, \
    rb.first_name || ' ' || rb.last_name AS returned_by_name";

const DETAIL_FROM: &str = "\
    transactions t \
    JOIN employees e ON e.id = t.employee_id \
    JOIN clothing_items i ON i.id = t.item_id \
    JOIN clothing_types ct ON ct.id = i.clothing_type_id \
    JOIN employees ib ON ib.id = t.issued_by_id \
    LEFT JOIN employees rb ON rb.id = t.returned_by_id";

// ---------------------------------------------------------------------------
// TransactionRepo
// ---------------------------------------------------------------------------

/// Provides ledger operations for issue cycles.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Open a new issue cycle.
    ///
    /// `issued_at` uses `clock_timestamp()` so every row of a batch carries
    /// its own instant rather than the transaction start time.
    pub async fn create_issue(
        conn: &mut PgConnection,
        input: &CreateIssue<'_>,
    ) -> Result<Transaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO transactions
                (employee_id, item_id, transaction_type, issued_at, issued_by_id,
                 condition_on_issue, notes)
             VALUES ($1, $2, $3, clock_timestamp(), $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(input.employee_id)
            .bind(input.item_id)
            .bind(TransactionType::Issue.as_str())
            .bind(input.issued_by_id)
            .bind(input.condition_on_issue.as_str())
            .bind(input.notes)
            .fetch_one(conn)
            .await
    }

    /// Complete an open issue cycle.
    ///
    /// Returns `None` if the row does not exist or was already returned.
    pub async fn record_return(
        conn: &mut PgConnection,
        id: DbId,
        input: &RecordReturn,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!(
            "UPDATE transactions SET
                returned_at = clock_timestamp(),
                returned_by_id = $2,
                condition_on_return = $3,
                notes = $4
             WHERE id = $1 AND returned_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .bind(input.returned_by_id)
            .bind(input.condition_on_return.as_str())
            .bind(&input.notes)
            .fetch_optional(conn)
            .await
    }

    /// Replace the notes of a ledger row. Callers build the new text with the
    /// append helpers in `workwear_core::ledger`.
    pub async fn update_notes(
        conn: &mut PgConnection,
        id: DbId,
        notes: Option<&str>,
    ) -> Result<Transaction, sqlx::Error> {
        let query = format!("UPDATE transactions SET notes = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .bind(notes)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM transactions WHERE id = $1");
        sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Lock the given ledger rows for the rest of the transaction, in id order.
    pub async fn lock_by_ids(
        conn: &mut PgConnection,
        ids: &[DbId],
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE id = ANY($1)
             ORDER BY id
             FOR UPDATE"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(ids)
            .fetch_all(conn)
            .await
    }

    /// The open issue cycle of an item, if any.
    pub async fn find_open_for_item<'e>(
        executor: impl PgExecutor<'e>,
        item_id: DbId,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE item_id = $1 AND returned_at IS NULL"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(item_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_detail_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<TransactionDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} WHERE t.id = $1");
        sqlx::query_as::<_, TransactionDetail>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Details for several rows, in the order the ids were given.
    pub async fn find_details_by_ids<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[DbId],
    ) -> Result<Vec<TransactionDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE t.id = ANY($1)
             ORDER BY array_position($1, t.id)"
        );
        sqlx::query_as::<_, TransactionDetail>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// List ledger rows, newest issue first.
    pub async fn list_details(
        pool: &PgPool,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE ($1::BIGINT IS NULL OR t.employee_id = $1)
               AND ($2::BIGINT IS NULL OR t.item_id = $2)
               AND ($3::BOOLEAN IS NULL OR (t.returned_at IS NULL) = $3)
             ORDER BY t.issued_at DESC, t.id DESC"
        );
        sqlx::query_as::<_, TransactionDetail>(&query)
            .bind(filter.employee_id)
            .bind(filter.item_id)
            .bind(filter.open)
            .fetch_all(pool)
            .await
    }
}
