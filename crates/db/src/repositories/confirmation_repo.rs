//! Repository for the `confirmations` table.

use sqlx::{PgConnection, PgExecutor, PgPool};
use workwear_core::types::DbId;

use crate::models::confirmation::{Confirmation, ConfirmationFilter, CreateConfirmation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, token, employee_id, protocol_type, items_json, confirmed, \
                        confirmed_at, expires_at, protocol_file_path, email_sent, \
                        email_sent_at, email_error, created_at, updated_at";

/// JSONB containment filter matching confirmations whose snapshot lists
/// transaction `$1`. Served by the GIN index on `items_json`.
const COVERS_TRANSACTION: &str =
    "items_json @> jsonb_build_object('transactionIds', jsonb_build_array($1::BIGINT))";

/// Provides token lifecycle operations for confirmations.
pub struct ConfirmationRepo;

impl ConfirmationRepo {
    /// Insert a new unconfirmed confirmation.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateConfirmation,
    ) -> Result<Confirmation, sqlx::Error> {
        let query = format!(
            "INSERT INTO confirmations (token, employee_id, protocol_type, items_json, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(&input.token)
            .bind(input.employee_id)
            .bind(input.protocol_type.as_str())
            .bind(&input.items_json)
            .bind(input.expires_at)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Confirmation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM confirmations WHERE id = $1");
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Confirmation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM confirmations WHERE token = $1");
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Find a confirmation by token and lock it for the rest of the transaction.
    pub async fn lock_by_token(
        conn: &mut PgConnection,
        token: &str,
    ) -> Result<Option<Confirmation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM confirmations WHERE token = $1 FOR UPDATE");
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(token)
            .fetch_optional(conn)
            .await
    }

    /// Flip `confirmed` to true. Returns `None` if it was already confirmed.
    pub async fn mark_confirmed(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Confirmation>, sqlx::Error> {
        let query = format!(
            "UPDATE confirmations SET confirmed = true, confirmed_at = NOW()
             WHERE id = $1 AND confirmed = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Record the result of an email delivery attempt.
    ///
    /// `email_sent_at` is only touched on success and `email_error` only on
    /// failure.
    pub async fn record_email_outcome<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        sent: bool,
        error: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE confirmations SET
                email_sent = $2,
                email_sent_at = CASE WHEN $2 THEN NOW() ELSE email_sent_at END,
                email_error = CASE WHEN $2 THEN email_error ELSE $3 END
             WHERE id = $1",
        )
        .bind(id)
        .bind(sent)
        .bind(error)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Store where the rendered protocol document was cached.
    pub async fn set_protocol_file_path<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        path: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE confirmations SET protocol_file_path = $2 WHERE id = $1")
            .bind(id)
            .bind(path)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// List confirmations, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &ConfirmationFilter,
    ) -> Result<Vec<Confirmation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM confirmations
             WHERE ($1::BIGINT IS NULL OR employee_id = $1)
               AND ($2::BOOLEAN IS NULL OR confirmed = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(filter.employee_id)
            .bind(filter.confirmed)
            .fetch_all(pool)
            .await
    }

    /// All confirmations whose snapshot covers a transaction, newest first.
    pub async fn find_covering(
        pool: &PgPool,
        transaction_id: DbId,
    ) -> Result<Vec<Confirmation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM confirmations
             WHERE {COVERS_TRANSACTION}
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(transaction_id)
            .fetch_all(pool)
            .await
    }

    /// The most recent confirmation of `employee_id` that is confirmed and
    /// covers a transaction.
    pub async fn find_confirmed_covering(
        pool: &PgPool,
        employee_id: DbId,
        transaction_id: DbId,
    ) -> Result<Option<Confirmation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM confirmations
             WHERE confirmed AND employee_id = $2 AND {COVERS_TRANSACTION}
             ORDER BY confirmed_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Confirmation>(&query)
            .bind(transaction_id)
            .bind(employee_id)
            .fetch_optional(pool)
            .await
    }
}
