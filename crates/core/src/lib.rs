//! Domain rules for the workwear inventory backend.
//!
//! This crate has no I/O and no internal dependencies so the database,
//! delivery, and API layers can all share the same definitions of item
//! states, ledger note handling, and the confirmation token protocol.

#[macro_use]
mod macros;

pub mod audit;
pub mod confirmation;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod roles;
pub mod types;
