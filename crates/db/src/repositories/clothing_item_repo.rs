//! Repository for the `clothing_items` table.
//!
//! Status and holder only change through the lifecycle methods here, which
//! are called inside the orchestrator's transactions after the row has been
//! locked with [`ClothingItemRepo::lock_by_ids`].

use sqlx::{PgConnection, PgExecutor, PgPool};
use workwear_core::inventory::{generate_internal_id, ItemCondition, ItemStatus};
use workwear_core::types::DbId;

use crate::models::clothing_item::{
    ClothingItem, CreateClothingItem, ItemFilter, UpdateClothingItem,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, internal_id, qr_code, clothing_type_id, size, category, condition, \
                        status, current_holder_id, personalized_for_id, retired_at, \
                        retired_by_id, retirement_reason, created_at, updated_at";

/// Attempts at drawing a fresh internal id before giving up.
const INTERNAL_ID_ATTEMPTS: usize = 5;

const UQ_INTERNAL_ID: &str = "uq_clothing_items_internal_id";

/// Provides catalog and lifecycle operations for clothing items.
pub struct ClothingItemRepo;

impl ClothingItemRepo {
    /// Insert a new AVAILABLE item with a generated internal id and QR code.
    ///
    /// An internal id collision inserts nothing and is retried with a new id,
    /// so this is safe to call inside an open transaction.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateClothingItem,
    ) -> Result<ClothingItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO clothing_items
                (internal_id, qr_code, clothing_type_id, size, category, condition,
                 status, personalized_for_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT ON CONSTRAINT {UQ_INTERNAL_ID} DO NOTHING
             RETURNING {COLUMNS}"
        );
        for attempt in 1..=INTERNAL_ID_ATTEMPTS {
            let created = sqlx::query_as::<_, ClothingItem>(&query)
                .bind(generate_internal_id())
                .bind(uuid::Uuid::new_v4().simple().to_string())
                .bind(input.clothing_type_id)
                .bind(&input.size)
                .bind(input.category.as_str())
                .bind(input.condition.unwrap_or(ItemCondition::New).as_str())
                .bind(ItemStatus::Available.as_str())
                .bind(input.personalized_for_id)
                .fetch_optional(&mut *conn)
                .await?;
            if let Some(item) = created {
                return Ok(item);
            }
            tracing::debug!(attempt, "Internal id collision, retrying");
        }
        Err(sqlx::Error::Protocol(format!(
            "No free internal id after {INTERNAL_ID_ATTEMPTS} attempts"
        )))
    }

    /// Find an item by internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<ClothingItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clothing_items WHERE id = $1");
        sqlx::query_as::<_, ClothingItem>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find an item by the token printed in its QR code.
    pub async fn find_by_qr_code(
        pool: &PgPool,
        qr_code: &str,
    ) -> Result<Option<ClothingItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clothing_items WHERE qr_code = $1");
        sqlx::query_as::<_, ClothingItem>(&query)
            .bind(qr_code)
            .fetch_optional(pool)
            .await
    }

    /// List items matching every filter that is set, ordered by internal id.
    pub async fn list(pool: &PgPool, filter: &ItemFilter) -> Result<Vec<ClothingItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clothing_items
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::BIGINT IS NULL OR current_holder_id = $2)
               AND ($3::BIGINT IS NULL OR clothing_type_id = $3)
             ORDER BY internal_id"
        );
        sqlx::query_as::<_, ClothingItem>(&query)
            .bind(filter.status.map(ItemStatus::as_str))
            .bind(filter.holder_id)
            .bind(filter.clothing_type_id)
            .fetch_all(pool)
            .await
    }

    /// Items currently held by an employee.
    pub async fn list_by_holder(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Vec<ClothingItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clothing_items
             WHERE current_holder_id = $1
             ORDER BY internal_id"
        );
        sqlx::query_as::<_, ClothingItem>(&query)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    /// Lock the given items for the rest of the transaction.
    ///
    /// Rows are locked in id order so concurrent batches cannot deadlock.
    /// Missing ids are simply absent from the result.
    pub async fn lock_by_ids(
        conn: &mut PgConnection,
        ids: &[DbId],
    ) -> Result<Vec<ClothingItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clothing_items
             WHERE id = ANY($1)
             ORDER BY id
             FOR UPDATE"
        );
        sqlx::query_as::<_, ClothingItem>(&query)
            .bind(ids)
            .fetch_all(conn)
            .await
    }

    /// Administrative edit of descriptive fields.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateClothingItem,
    ) -> Result<Option<ClothingItem>, sqlx::Error> {
        let query = format!(
            "UPDATE clothing_items SET
                clothing_type_id = COALESCE($2, clothing_type_id),
                size = COALESCE($3, size),
                category = COALESCE($4, category),
                condition = COALESCE($5, condition),
                personalized_for_id = COALESCE($6, personalized_for_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClothingItem>(&query)
            .bind(id)
            .bind(input.clothing_type_id)
            .bind(&input.size)
            .bind(input.category.map(|c| c.as_str()))
            .bind(input.condition.map(ItemCondition::as_str))
            .bind(input.personalized_for_id)
            .fetch_optional(conn)
            .await
    }

    /// Move an item to `status` with the given holder, optionally recording a
    /// new physical condition.
    pub async fn set_possession(
        conn: &mut PgConnection,
        id: DbId,
        status: ItemStatus,
        holder_id: Option<DbId>,
        condition: Option<ItemCondition>,
    ) -> Result<ClothingItem, sqlx::Error> {
        let query = format!(
            "UPDATE clothing_items SET
                status = $2,
                current_holder_id = $3,
                condition = COALESCE($4, condition)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClothingItem>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(holder_id)
            .bind(condition.map(ItemCondition::as_str))
            .fetch_one(conn)
            .await
    }

    /// Retire an item: status RETIRED, condition RETIRED, retirement audit fields set.
    pub async fn retire(
        conn: &mut PgConnection,
        id: DbId,
        retired_by_id: DbId,
        reason: Option<&str>,
    ) -> Result<ClothingItem, sqlx::Error> {
        let query = format!(
            "UPDATE clothing_items SET
                status = $2,
                condition = $3,
                current_holder_id = NULL,
                retired_at = NOW(),
                retired_by_id = $4,
                retirement_reason = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClothingItem>(&query)
            .bind(id)
            .bind(ItemStatus::Retired.as_str())
            .bind(ItemCondition::Retired.as_str())
            .bind(retired_by_id)
            .bind(reason)
            .fetch_one(conn)
            .await
    }

    /// Number of ledger rows referencing an item.
    pub async fn count_transactions<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions WHERE item_id = $1")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Hard-delete an item. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clothing_items WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
