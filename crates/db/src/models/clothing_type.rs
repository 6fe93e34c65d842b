//! Clothing type (catalog entry) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workwear_core::types::{DbId, Timestamp};

/// A row from the `clothing_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClothingType {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new clothing type.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClothingType {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// DTO for updating a clothing type. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClothingType {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}
