//! Transaction ledger rules: return-note concatenation and bulk request checks.

use std::collections::HashSet;

use crate::inventory::ItemStatus;
use crate::types::DbId;

/// Prefix for notes added by a single or uniform bulk return.
pub const RETURN_NOTE_PREFIX: &str = "Return:";

/// Prefix for the batch-wide notes of an individual bulk return.
pub const GENERAL_RETURN_NOTE_PREFIX: &str = "Return (General):";

/// Prefix for per-item notes of an individual bulk return.
pub const ITEM_RETURN_NOTE_PREFIX: &str = "Return (Item):";

/// Prefix for the note written when an item is marked lost while issued.
pub const LOST_NOTE_PREFIX: &str = "Lost:";

const NOTE_SEPARATOR: &str = "\n";

/// Append `addition` to `existing` under `prefix`.
///
/// Issue-time notes are never overwritten. Blank additions leave the notes
/// untouched.
pub fn append_note(existing: Option<&str>, prefix: &str, addition: Option<&str>) -> Option<String> {
    let addition = addition.map(str::trim).filter(|s| !s.is_empty());
    let existing = existing.filter(|s| !s.trim().is_empty());
    match (existing, addition) {
        (None, None) => None,
        (Some(e), None) => Some(e.to_string()),
        (None, Some(a)) => Some(format!("{prefix} {a}")),
        (Some(e), Some(a)) => Some(format!("{e}{NOTE_SEPARATOR}{prefix} {a}")),
    }
}

/// Notes for a single or uniform bulk return.
pub fn return_notes(existing: Option<&str>, notes: Option<&str>) -> Option<String> {
    append_note(existing, RETURN_NOTE_PREFIX, notes)
}

/// Notes for one row of an individual bulk return: original, then general, then item.
pub fn individual_return_notes(
    existing: Option<&str>,
    general: Option<&str>,
    item: Option<&str>,
) -> Option<String> {
    let with_general = append_note(existing, GENERAL_RETURN_NOTE_PREFIX, general);
    append_note(with_general.as_deref(), ITEM_RETURN_NOTE_PREFIX, item)
}

/// Notes for the open transaction of an item marked lost.
pub fn lost_notes(existing: Option<&str>, notes: Option<&str>) -> Option<String> {
    append_note(existing, LOST_NOTE_PREFIX, notes)
}

/// Ids that appear more than once, in first-repeat order.
pub fn find_duplicates(ids: &[DbId]) -> Vec<DbId> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    ids.iter()
        .copied()
        .filter(|id| !seen.insert(*id) && reported.insert(*id))
        .collect()
}

/// Validate the id list of a bulk request: non-empty and free of repeats.
pub fn validate_bulk_ids(ids: &[DbId], what: &str) -> Result<(), String> {
    if ids.is_empty() {
        return Err(format!("At least one {what} id is required"));
    }
    let duplicates = find_duplicates(ids);
    if !duplicates.is_empty() {
        let list: Vec<String> = duplicates.iter().map(ToString::to_string).collect();
        return Err(format!("Duplicate {what} ids in request: {}", list.join(", ")));
    }
    Ok(())
}

/// Message enumerating items that cannot be issued, with their current status.
pub fn unavailable_items_message(items: &[(String, ItemStatus)]) -> String {
    let list: Vec<String> = items
        .iter()
        .map(|(internal_id, status)| format!("{internal_id} ({status})"))
        .collect();
    format!("The following items are not available: {}", list.join(", "))
}

/// Message enumerating items whose status blocks a return, with that status.
pub fn unreturnable_items_message(items: &[(String, ItemStatus)]) -> String {
    let list: Vec<String> = items
        .iter()
        .map(|(internal_id, status)| format!("{internal_id} ({status})"))
        .collect();
    format!("The following items cannot be returned: {}", list.join(", "))
}

/// Message enumerating items whose transactions were already returned.
pub fn already_returned_message(internal_ids: &[String]) -> String {
    format!(
        "The following items have already been returned: {}",
        internal_ids.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_note_appends_to_issue_notes() {
        let notes = return_notes(Some("Size swap requested"), Some("Stain on sleeve"));
        assert_eq!(
            notes.as_deref(),
            Some("Size swap requested\nReturn: Stain on sleeve")
        );
    }

    #[test]
    fn return_note_without_issue_notes() {
        assert_eq!(
            return_notes(None, Some("ok")).as_deref(),
            Some("Return: ok")
        );
    }

    #[test]
    fn blank_return_note_keeps_original() {
        assert_eq!(
            return_notes(Some("original"), Some("   ")).as_deref(),
            Some("original")
        );
        assert_eq!(return_notes(None, None), None);
    }

    #[test]
    fn individual_notes_order_is_original_general_item() {
        let notes = individual_return_notes(Some("issued new"), Some("end of season"), Some("torn"));
        assert_eq!(
            notes.as_deref(),
            Some("issued new\nReturn (General): end of season\nReturn (Item): torn")
        );
    }

    #[test]
    fn individual_notes_skip_missing_parts() {
        assert_eq!(
            individual_return_notes(None, None, Some("torn")).as_deref(),
            Some("Return (Item): torn")
        );
        assert_eq!(
            individual_return_notes(Some("a"), Some("b"), None).as_deref(),
            Some("a\nReturn (General): b")
        );
    }

    #[test]
    fn lost_note_keeps_issue_notes() {
        assert_eq!(
            lost_notes(Some("issued for site B"), Some("left on site")).as_deref(),
            Some("issued for site B\nLost: left on site")
        );
    }

    #[test]
    fn duplicates_reported_once() {
        assert_eq!(find_duplicates(&[1, 2, 1, 3, 1, 2]), vec![1, 2]);
        assert!(find_duplicates(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn bulk_ids_must_be_non_empty_and_unique() {
        assert!(validate_bulk_ids(&[], "item").is_err());
        let err = validate_bulk_ids(&[4, 4], "item").unwrap_err();
        assert_eq!(err, "Duplicate item ids in request: 4");
        assert!(validate_bulk_ids(&[1, 2], "item").is_ok());
    }

    #[test]
    fn unavailable_message_lists_internal_ids_and_status() {
        let msg = unavailable_items_message(&[
            ("CLO-AAA111".into(), ItemStatus::Pending),
            ("CLO-BBB222".into(), ItemStatus::Retired),
        ]);
        assert_eq!(
            msg,
            "The following items are not available: CLO-AAA111 (PENDING), CLO-BBB222 (RETIRED)"
        );
    }

    #[test]
    fn already_returned_message_lists_internal_ids() {
        assert_eq!(
            already_returned_message(&["CLO-AAA111".into(), "CLO-CCC333".into()]),
            "The following items have already been returned: CLO-AAA111, CLO-CCC333"
        );
    }
}
