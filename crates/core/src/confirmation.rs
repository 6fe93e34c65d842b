//! Email confirmation token protocol.
//!
//! A confirmation binds an unguessable token to the set of transactions an
//! employee is asked to acknowledge. The items snapshot is stored verbatim at
//! creation time and is never re-derived from live item data, so later edits
//! to items or clothing types do not change what the employee confirmed.

use chrono::Duration;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::inventory::ItemCategory;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Random bytes per token (256 bits of entropy).
pub const TOKEN_BYTES: usize = 32;

/// Length of the hex-encoded token.
pub const TOKEN_HEX_LEN: usize = TOKEN_BYTES * 2;

/// Days until an unconfirmed token stops being accepted.
pub const CONFIRMATION_TTL_DAYS: i64 = 7;

define_text_enum! {
    /// Which protocol document a confirmation unlocks.
    ProtocolType {
        Single = "SINGLE",
        BulkIssue = "BULK_ISSUE",
        BulkReturn = "BULK_RETURN",
    }
}

impl ProtocolType {
    /// Protocol type for an issuance covering `transaction_count` rows.
    pub fn for_issue(transaction_count: usize) -> Self {
        if transaction_count > 1 {
            Self::BulkIssue
        } else {
            Self::Single
        }
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// Generate a new hex-encoded confirmation token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Cheap shape check so malformed tokens never reach the database.
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == TOKEN_HEX_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Expiry timestamp for a confirmation created at `created_at`.
pub fn expires_at(created_at: Timestamp) -> Timestamp {
    created_at + Duration::days(CONFIRMATION_TTL_DAYS)
}

/// A token is expired strictly after its expiry instant.
pub fn is_expired(expires_at: Timestamp, now: Timestamp) -> bool {
    now > expires_at
}

/// Build the public confirmation link sent to the employee.
pub fn confirmation_link(base_url: &str, token: &str) -> String {
    format!("{}/confirm/{token}", base_url.trim_end_matches('/'))
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }
}

// ---------------------------------------------------------------------------
// Confirm decision
// ---------------------------------------------------------------------------

/// Result of evaluating a confirm request against the stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmDecision {
    /// Flip `confirmed` to true now.
    Confirm,
    /// Already confirmed earlier; report success without changes.
    AlreadyConfirmed,
}

/// Decide what a confirm request does.
///
/// A repeated confirm of an already-confirmed token succeeds without changes,
/// even once the expiry has passed. An unconfirmed token past its expiry is
/// rejected.
pub fn evaluate_confirm(
    confirmed: bool,
    expires_at: Timestamp,
    now: Timestamp,
) -> Result<ConfirmDecision, CoreError> {
    if confirmed {
        return Ok(ConfirmDecision::AlreadyConfirmed);
    }
    if is_expired(expires_at, now) {
        return Err(CoreError::Expired(format!(
            "Confirmation link expired at {}",
            expires_at.format("%Y-%m-%d %H:%M UTC")
        )));
    }
    Ok(ConfirmDecision::Confirm)
}

// ---------------------------------------------------------------------------
// Items snapshot
// ---------------------------------------------------------------------------

/// One line of the snapshot shown to the employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    pub name: String,
    pub size: String,
    pub category: ItemCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub quantity: i32,
}

/// Stored `items_json` payload: what was issued and which ledger rows it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsSnapshot {
    pub items: Vec<SnapshotItem>,
    pub transaction_ids: Vec<DbId>,
}

impl ItemsSnapshot {
    /// Build a snapshot, merging identical lines into a quantity.
    pub fn new(items: Vec<SnapshotItem>, transaction_ids: Vec<DbId>) -> Self {
        Self {
            items: collapse_items(items),
            transaction_ids,
        }
    }

    /// True iff `transaction_id` was part of the confirmation when it was issued.
    pub fn belongs_to(&self, transaction_id: DbId) -> bool {
        self.transaction_ids.contains(&transaction_id)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, CoreError> {
        serde_json::to_value(self)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize items snapshot: {e}")))
    }

    pub fn from_value(value: &serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value.clone())
            .map_err(|e| CoreError::Internal(format!("Malformed items snapshot: {e}")))
    }
}

/// Merge lines with the same name, size, category, and image, keeping first-seen order.
fn collapse_items(items: Vec<SnapshotItem>) -> Vec<SnapshotItem> {
    let mut merged: Vec<SnapshotItem> = Vec::with_capacity(items.len());
    for item in items {
        match merged.iter_mut().find(|m| {
            m.name == item.name
                && m.size == item.size
                && m.category == item.category
                && m.image_url == item.image_url
        }) {
            Some(existing) => existing.quantity += item.quantity,
            None => merged.push(item),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(name: &str, size: &str) -> SnapshotItem {
        SnapshotItem {
            name: name.into(),
            size: size.into(),
            category: ItemCategory::Pool,
            image_url: None,
            quantity: 1,
        }
    }

    #[test]
    fn token_has_256_bits_hex_encoded() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(is_well_formed_token(&token));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn malformed_tokens_rejected() {
        assert!(!is_well_formed_token("abc"));
        assert!(!is_well_formed_token(&"z".repeat(64)));
    }

    #[test]
    fn expiry_is_seven_days() {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            expires_at(created),
            Utc.with_ymd_and_hms(2026, 3, 8, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn expired_unconfirmed_token_fails() {
        let expiry = Utc.with_ymd_and_hms(2026, 3, 8, 12, 0, 0).unwrap();
        let later = expiry + Duration::seconds(1);
        assert!(matches!(
            evaluate_confirm(false, expiry, later),
            Err(CoreError::Expired(_))
        ));
    }

    #[test]
    fn token_valid_at_exact_expiry_instant() {
        let expiry = Utc.with_ymd_and_hms(2026, 3, 8, 12, 0, 0).unwrap();
        assert_eq!(
            evaluate_confirm(false, expiry, expiry).unwrap(),
            ConfirmDecision::Confirm
        );
    }

    #[test]
    fn repeated_confirm_is_idempotent() {
        let expiry = Utc.with_ymd_and_hms(2026, 3, 8, 12, 0, 0).unwrap();
        assert_eq!(
            evaluate_confirm(true, expiry, expiry + Duration::days(30)).unwrap(),
            ConfirmDecision::AlreadyConfirmed
        );
    }

    #[test]
    fn snapshot_membership() {
        let snapshot = ItemsSnapshot::new(vec![item("Jacket", "L")], vec![10, 11]);
        assert!(snapshot.belongs_to(10));
        assert!(snapshot.belongs_to(11));
        assert!(!snapshot.belongs_to(12));
    }

    #[test]
    fn snapshot_collapses_identical_lines() {
        let snapshot = ItemsSnapshot::new(
            vec![item("Shirt", "M"), item("Shirt", "M"), item("Shirt", "L")],
            vec![1, 2, 3],
        );
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.items[0].quantity, 2);
        assert_eq!(snapshot.items[1].size, "L");
    }

    #[test]
    fn snapshot_json_uses_camel_case() {
        let snapshot = ItemsSnapshot::new(vec![item("Cap", "U")], vec![7]);
        let value = snapshot.to_value().unwrap();
        assert_eq!(value["transactionIds"], serde_json::json!([7]));
        assert_eq!(value["items"][0]["category"], "POOL");
        assert_eq!(ItemsSnapshot::from_value(&value).unwrap(), snapshot);
    }

    #[test]
    fn protocol_type_follows_item_count() {
        assert_eq!(ProtocolType::for_issue(1), ProtocolType::Single);
        assert_eq!(ProtocolType::for_issue(4), ProtocolType::BulkIssue);
    }

    #[test]
    fn link_strips_trailing_slash() {
        assert_eq!(
            confirmation_link("https://ww.example.com/", "ab12"),
            "https://ww.example.com/confirm/ab12"
        );
    }
}
