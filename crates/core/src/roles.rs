//! Well-known role name constants.
//!
//! These must match the `ck_employees_role` constraint in
//! `20260301000001_create_employees.sql`.

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_WAREHOUSE: &str = "WAREHOUSE";
pub const ROLE_HR: &str = "HR";
pub const ROLE_READ_ONLY: &str = "READ_ONLY";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_WAREHOUSE, ROLE_HR, ROLE_READ_ONLY];

/// Validate that a role string is one of the known roles.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

/// Roles allowed to issue, return, and edit inventory.
pub fn can_write_inventory(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_WAREHOUSE
}

/// Roles allowed to see per-employee confirmation records.
pub fn can_read_people(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_WAREHOUSE || role == ROLE_HR
}
