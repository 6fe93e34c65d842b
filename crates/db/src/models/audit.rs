//! Audit log model.

use serde::Serialize;
use sqlx::FromRow;
use workwear_core::audit::{AuditAction, AuditChange};
use workwear_core::types::{DbId, Timestamp};

/// A row from the `audit_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub action: String,
    pub actor_id: Option<DbId>,
    pub changes: serde_json::Value,
    pub created_at: Timestamp,
}

/// Entity type names stored in `audit_logs.entity_type`.
pub mod entity_types {
    pub const CLOTHING_ITEM: &str = "clothing_item";
    pub const TRANSACTION: &str = "transaction";
    pub const CONFIRMATION: &str = "confirmation";
}

/// Repository input for a new audit entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub entity_type: &'static str,
    pub entity_id: DbId,
    pub action: AuditAction,
    pub actor_id: Option<DbId>,
    pub changes: Vec<AuditChange>,
}

impl CreateAuditLog {
    pub fn new(entity_type: &'static str, entity_id: DbId, action: AuditAction) -> Self {
        Self {
            entity_type,
            entity_id,
            action,
            actor_id: None,
            changes: Vec::new(),
        }
    }

    pub fn actor(mut self, actor_id: DbId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Add a change, skipping `None` (unchanged field).
    pub fn change(mut self, change: Option<AuditChange>) -> Self {
        self.changes.extend(change);
        self
    }
}
