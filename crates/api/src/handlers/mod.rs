//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource. Plain
//! reads go straight to the repositories in `workwear_db`; anything that
//! changes item possession or confirmation state goes through the lifecycle
//! services on [`AppState`](crate::state::AppState).

pub mod clothing_type;
pub mod confirmation;
pub mod employee;
pub mod item;
pub mod public;
pub mod transaction;
