//! Clothing item model and DTOs.
//!
//! `status`, `condition`, and `category` are stored as TEXT and parsed into
//! the `workwear_core::inventory` enums where lifecycle rules apply.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workwear_core::error::CoreError;
use workwear_core::inventory::{ItemCategory, ItemCondition, ItemStatus};
use workwear_core::types::{DbId, Timestamp};

/// A row from the `clothing_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClothingItem {
    pub id: DbId,
    /// Human-readable id printed on labels, e.g. `CLO-7KQ2XM`.
    pub internal_id: String,
    /// Opaque token encoded in the item's QR code.
    pub qr_code: String,
    pub clothing_type_id: DbId,
    pub size: String,
    pub category: String,
    pub condition: String,
    pub status: String,
    pub current_holder_id: Option<DbId>,
    pub personalized_for_id: Option<DbId>,
    pub retired_at: Option<Timestamp>,
    pub retired_by_id: Option<DbId>,
    pub retirement_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ClothingItem {
    pub fn status(&self) -> Result<ItemStatus, CoreError> {
        self.status.parse()
    }

    pub fn condition(&self) -> Result<ItemCondition, CoreError> {
        self.condition.parse()
    }
}

/// DTO for adding an item to the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClothingItem {
    pub clothing_type_id: DbId,
    pub size: String,
    pub category: ItemCategory,
    pub condition: Option<ItemCondition>,
    pub personalized_for_id: Option<DbId>,
}

/// DTO for the administrative edit. Status and holder are not editable here;
/// they only change through issue, return, retire, and mark-lost.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClothingItem {
    pub clothing_type_id: Option<DbId>,
    pub size: Option<String>,
    pub category: Option<ItemCategory>,
    pub condition: Option<ItemCondition>,
    pub personalized_for_id: Option<DbId>,
}

/// Query-string filters for listing items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    pub status: Option<ItemStatus>,
    pub holder_id: Option<DbId>,
    pub clothing_type_id: Option<DbId>,
}

/// Request body for `POST /items/{id}/retire`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetireItemRequest {
    pub reason: Option<String>,
}

/// Request body for `POST /items/{id}/mark-lost`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkLostRequest {
    pub notes: Option<String>,
}
