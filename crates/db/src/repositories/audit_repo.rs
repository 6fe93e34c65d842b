//! Repository for the append-only `audit_logs` table.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use workwear_core::types::DbId;

use crate::models::audit::{AuditLog, CreateAuditLog};

const COLUMNS: &str = "id, entity_type, entity_id, action, actor_id, changes, created_at";

/// Provides append and query operations for the audit trail.
pub struct AuditRepo;

impl AuditRepo {
    /// Append one entry. Called inside the same transaction as the mutation
    /// it records, so a rolled-back mutation leaves no audit trace.
    pub async fn append(
        conn: &mut PgConnection,
        entry: &CreateAuditLog,
    ) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs (entity_type, entity_id, action, actor_id, changes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.entity_type)
            .bind(entry.entity_id)
            .bind(entry.action.as_str())
            .bind(entry.actor_id)
            .bind(Json(&entry.changes))
            .fetch_one(conn)
            .await
    }

    /// Audit trail of one entity, oldest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY id"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }
}
