//! Clothing item lifecycle: statuses, conditions, and the possession state machine.
//!
//! ```text
//!              issue                 return
//!  AVAILABLE ─────────► PENDING ─────────────┐
//!      │  ▲              (ISSUED / IN_USE)   │
//!      │  └──────────────────────────────────┘
//!      │ retire
//!      ▼
//!   RETIRED            LOST (administrative override only)
//! ```
//!
//! RETURNED is transient: a return normalizes straight back to AVAILABLE.

use rand::Rng;

use crate::error::CoreError;
use crate::types::DbId;

define_text_enum! {
    /// Possession / lifecycle status of a clothing item.
    ItemStatus {
        Available = "AVAILABLE",
        /// Issued, awaiting the employee's confirmation of receipt.
        Pending = "PENDING",
        Issued = "ISSUED",
        InUse = "IN_USE",
        Returned = "RETURNED",
        Retired = "RETIRED",
        Lost = "LOST",
    }
}

define_text_enum! {
    /// Physical condition recorded on issue and on return.
    ItemCondition {
        New = "NEW",
        Good = "GOOD",
        Worn = "WORN",
        Retired = "RETIRED",
    }
}

define_text_enum! {
    /// Whether an item belongs to one person or to the shared pool.
    ItemCategory {
        Personalized = "PERSONALIZED",
        Pool = "POOL",
    }
}

define_text_enum! {
    /// Employment status mirrored from the identity provider.
    EmployeeStatus {
        Active = "ACTIVE",
        Inactive = "INACTIVE",
    }
}

define_text_enum! {
    /// Ledger row type. Returns mutate the ISSUE row rather than adding one.
    TransactionType {
        Issue = "ISSUE",
    }
}

/// Lifecycle actions that move an item between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    Issue,
    Return,
    Retire,
    MarkLost,
}

impl ItemStatus {
    /// Statuses in which somebody holds the item.
    pub fn requires_holder(self) -> bool {
        matches!(self, Self::Pending | Self::Issued | Self::InUse)
    }

    /// Statuses in which the item must not have a holder.
    pub fn forbids_holder(self) -> bool {
        matches!(self, Self::Available | Self::Retired)
    }

    /// RETIRED and LOST accept no further lifecycle action except hard delete.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Retired | Self::Lost)
    }

    /// Compute the status reached by applying `action`, or `None` if the
    /// transition is not allowed from this status.
    pub fn apply(self, action: ItemAction) -> Option<ItemStatus> {
        use ItemStatus::*;
        match (self, action) {
            (Available, ItemAction::Issue) => Some(Pending),
            (Pending | Issued | InUse | Returned, ItemAction::Return) => Some(Available),
            (Available | Returned, ItemAction::Retire) => Some(Retired),
            (s, ItemAction::MarkLost) if !s.is_terminal() => Some(Lost),
            _ => None,
        }
    }
}

/// Check the holder/status invariant for a single item.
pub fn check_holder_invariant(status: ItemStatus, holder: Option<DbId>) -> Result<(), CoreError> {
    if status.requires_holder() && holder.is_none() {
        return Err(CoreError::InvalidState(format!(
            "Status {status} requires a current holder"
        )));
    }
    if status.forbids_holder() && holder.is_some() {
        return Err(CoreError::InvalidState(format!(
            "Status {status} must not have a current holder"
        )));
    }
    Ok(())
}

/// Prefix of every human-readable item id.
pub const INTERNAL_ID_PREFIX: &str = "CLO-";

/// Number of random characters after the prefix.
pub const INTERNAL_ID_SUFFIX_LEN: usize = 6;

const INTERNAL_ID_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a human-readable internal id such as `CLO-7KQ2XM`.
///
/// Ambiguous glyphs (`0/O`, `1/I`) are excluded so ids can be read off a label.
pub fn generate_internal_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..INTERNAL_ID_SUFFIX_LEN)
        .map(|_| INTERNAL_ID_CHARSET[rng.random_range(0..INTERNAL_ID_CHARSET.len())] as char)
        .collect();
    format!("{INTERNAL_ID_PREFIX}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_only_from_available() {
        assert_eq!(
            ItemStatus::Available.apply(ItemAction::Issue),
            Some(ItemStatus::Pending)
        );
        for status in [
            ItemStatus::Pending,
            ItemStatus::Issued,
            ItemStatus::InUse,
            ItemStatus::Retired,
            ItemStatus::Lost,
        ] {
            assert_eq!(status.apply(ItemAction::Issue), None, "{status}");
        }
    }

    #[test]
    fn return_allowed_without_confirmation() {
        assert_eq!(
            ItemStatus::Pending.apply(ItemAction::Return),
            Some(ItemStatus::Available)
        );
        assert_eq!(
            ItemStatus::InUse.apply(ItemAction::Return),
            Some(ItemStatus::Available)
        );
    }

    #[test]
    fn terminal_statuses_cannot_be_returned() {
        assert_eq!(ItemStatus::Lost.apply(ItemAction::Return), None);
        assert_eq!(ItemStatus::Retired.apply(ItemAction::Return), None);
        assert_eq!(ItemStatus::Available.apply(ItemAction::Return), None);
    }

    #[test]
    fn retire_requires_available() {
        assert_eq!(
            ItemStatus::Available.apply(ItemAction::Retire),
            Some(ItemStatus::Retired)
        );
        assert_eq!(ItemStatus::Pending.apply(ItemAction::Retire), None);
    }

    #[test]
    fn lost_is_reachable_from_any_non_terminal_status() {
        assert_eq!(
            ItemStatus::Issued.apply(ItemAction::MarkLost),
            Some(ItemStatus::Lost)
        );
        assert_eq!(ItemStatus::Retired.apply(ItemAction::MarkLost), None);
    }

    #[test]
    fn holder_invariant() {
        assert!(check_holder_invariant(ItemStatus::Pending, Some(1)).is_ok());
        assert!(check_holder_invariant(ItemStatus::Pending, None).is_err());
        assert!(check_holder_invariant(ItemStatus::Available, None).is_ok());
        assert!(check_holder_invariant(ItemStatus::Available, Some(1)).is_err());
        assert!(check_holder_invariant(ItemStatus::Retired, Some(1)).is_err());
        assert!(check_holder_invariant(ItemStatus::Lost, Some(1)).is_ok());
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in ItemStatus::ALL {
            assert_eq!(status.as_str().parse::<ItemStatus>().unwrap(), *status);
        }
        assert_eq!(ItemStatus::InUse.to_string(), "IN_USE");
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let err = "BORROWED".parse::<ItemStatus>().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("AVAILABLE"));
    }

    #[test]
    fn internal_id_format() {
        let id = generate_internal_id();
        assert!(id.starts_with(INTERNAL_ID_PREFIX));
        assert_eq!(id.len(), INTERNAL_ID_PREFIX.len() + INTERNAL_ID_SUFFIX_LEN);
        assert!(id[INTERNAL_ID_PREFIX.len()..]
            .bytes()
            .all(|b| INTERNAL_ID_CHARSET.contains(&b)));
    }
}
