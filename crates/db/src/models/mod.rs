//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - Request bodies for the lifecycle endpoints where the entity has them

pub mod audit;
pub mod clothing_item;
pub mod clothing_type;
pub mod confirmation;
pub mod employee;
pub mod transaction;
