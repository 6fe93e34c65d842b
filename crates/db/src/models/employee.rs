//! Employee entity model and DTOs.
//!
//! Employees are owned by the identity provider; this table mirrors the
//! fields the inventory lifecycle consults.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workwear_core::inventory::EmployeeStatus;
use workwear_core::types::{DbId, Timestamp};

/// A row from the `employees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub entra_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Role name (e.g. `"ADMIN"`, `"WAREHOUSE"`).
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active.as_str()
    }

    /// `"First Last <email>"`, used where a message must name the person.
    pub fn display_with_email(&self) -> String {
        format!("{} <{}>", self.full_name(), self.email)
    }
}

/// DTO for creating a new employee.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployee {
    pub entra_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Option<String>,
    pub status: Option<EmployeeStatus>,
}
