//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated employee from a JWT Bearer token.
//! - [`rbac::RequireAuth`] -- Any authenticated employee.
//! - [`rbac::RequireInventoryWrite`] -- `ADMIN` or `WAREHOUSE`.
//! - [`rbac::RequirePeopleRead`] -- `ADMIN`, `WAREHOUSE`, or `HR`.
//! - [`rbac::RequireAdmin`] -- `ADMIN` only.

pub mod auth;
pub mod rbac;
