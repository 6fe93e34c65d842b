//! Audit log change records.
//!
//! Changes are a closed set of per-entity field edits rather than free-form
//! JSON, so every writer names the field it touched.

use serde::{Deserialize, Serialize};

define_text_enum! {
    /// What happened to the audited entity.
    AuditAction {
        Create = "CREATE",
        Update = "UPDATE",
        Issue = "ISSUE",
        Return = "RETURN",
        Retire = "RETIRE",
        MarkLost = "MARK_LOST",
        Confirm = "CONFIRM",
        Delete = "DELETE",
    }
}

define_text_enum! {
    /// Audited fields of a clothing item.
    ItemField {
        Status = "status",
        Condition = "condition",
        CurrentHolder = "current_holder_id",
        Size = "size",
        ClothingType = "clothing_type_id",
        Category = "category",
        PersonalizedFor = "personalized_for_id",
        RetirementReason = "retirement_reason",
    }
}

define_text_enum! {
    /// Audited fields of a ledger transaction.
    TransactionField {
        Created = "created",
        ReturnedAt = "returned_at",
        ConditionOnReturn = "condition_on_return",
        Notes = "notes",
    }
}

define_text_enum! {
    /// Audited fields of a confirmation.
    ConfirmationField {
        Confirmed = "confirmed",
        ProtocolFilePath = "protocol_file_path",
    }
}

/// One field edit, tagged by entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum AuditChange {
    ClothingItem {
        field: ItemField,
        old: Option<String>,
        new: Option<String>,
    },
    Transaction {
        field: TransactionField,
        old: Option<String>,
        new: Option<String>,
    },
    Confirmation {
        field: ConfirmationField,
        old: Option<String>,
        new: Option<String>,
    },
}

impl AuditChange {
    /// Item field change, or `None` when the value did not change.
    pub fn item<T: ToString>(field: ItemField, old: Option<T>, new: Option<T>) -> Option<Self> {
        let (old, new) = (old.map(|v| v.to_string()), new.map(|v| v.to_string()));
        (old != new).then_some(Self::ClothingItem { field, old, new })
    }

    pub fn transaction<T: ToString>(
        field: TransactionField,
        old: Option<T>,
        new: Option<T>,
    ) -> Option<Self> {
        let (old, new) = (old.map(|v| v.to_string()), new.map(|v| v.to_string()));
        (old != new).then_some(Self::Transaction { field, old, new })
    }

    pub fn confirmation<T: ToString>(
        field: ConfirmationField,
        old: Option<T>,
        new: Option<T>,
    ) -> Option<Self> {
        let (old, new) = (old.map(|v| v.to_string()), new.map(|v| v.to_string()));
        (old != new).then_some(Self::Confirmation { field, old, new })
    }
}
