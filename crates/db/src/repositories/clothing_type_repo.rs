//! Repository for the `clothing_types` table.

use sqlx::{PgExecutor, PgPool};
use workwear_core::types::DbId;

use crate::models::clothing_type::{ClothingType, CreateClothingType, UpdateClothingType};

const COLUMNS: &str = "id, name, description, image_url, created_at, updated_at";

/// Provides CRUD operations for the clothing catalog.
pub struct ClothingTypeRepo;

impl ClothingTypeRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateClothingType,
    ) -> Result<ClothingType, sqlx::Error> {
        let query = format!(
            "INSERT INTO clothing_types (name, description, image_url)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClothingType>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<ClothingType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clothing_types WHERE id = $1");
        sqlx::query_as::<_, ClothingType>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all clothing types alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<ClothingType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clothing_types ORDER BY name");
        sqlx::query_as::<_, ClothingType>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a clothing type. Only non-`None` fields in `input` are applied.
    ///
    /// Existing confirmation snapshots keep the name they were created with.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClothingType,
    ) -> Result<Option<ClothingType>, sqlx::Error> {
        let query = format!(
            "UPDATE clothing_types SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClothingType>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a clothing type. Fails with a foreign key violation while items
    /// still reference it.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clothing_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
