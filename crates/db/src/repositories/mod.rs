//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads that
//! stand alone accept `&PgPool`; anything that must run inside a lifecycle
//! transaction accepts `&mut PgConnection` (pass `&mut *tx`) or a generic
//! `PgExecutor` so it works with both.

pub mod audit_repo;
pub mod clothing_item_repo;
pub mod clothing_type_repo;
pub mod confirmation_repo;
pub mod employee_repo;
pub mod transaction_repo;

pub use audit_repo::AuditRepo;
pub use clothing_item_repo::ClothingItemRepo;
pub use clothing_type_repo::ClothingTypeRepo;
pub use confirmation_repo::ConfirmationRepo;
pub use employee_repo::EmployeeRepo;
pub use transaction_repo::TransactionRepo;
