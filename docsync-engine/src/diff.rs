//! Change detection
//!
//! Compares the live item set against the stored inventory and produces a
//! per-item Upload or Skip verdict. The comparison is strictly between the
//! origin timestamp recorded in object metadata and the item's current
//! origin timestamp; the store's own write time is never consulted.

use std::collections::HashMap;

use docsync_traits::{Item, StoredObject};
use tracing::debug;

use crate::key::storage_key;
use crate::model::{DecisionReason, SyncAction, SyncDecision};

/// Compute a verdict for every item.
///
/// Items are processed in id order so repeated runs over the same input
/// produce the same decision list.
pub fn plan(
    items: &HashMap<String, Item>,
    inventory: &HashMap<String, StoredObject>,
) -> Vec<SyncDecision> {
    let mut ordered: Vec<&Item> = items.values().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    let mut decisions = Vec::with_capacity(ordered.len());
    for item in ordered {
        let decision = decide(item, inventory);
        debug!(
            item_id = %decision.item.id,
            key = %decision.key,
            action = ?decision.action,
            reason = decision.reason.as_str(),
            "Planned"
        );
        decisions.push(decision);
    }
    decisions
}

fn decide(item: &Item, inventory: &HashMap<String, StoredObject>) -> SyncDecision {
    let key = storage_key(&item.link_value);

    if !item.kind.is_document() {
        return SyncDecision {
            item: item.clone(),
            key,
            action: SyncAction::Skip,
            reason: DecisionReason::NonDocument,
        };
    }

    let (action, reason) = match inventory.get(&key) {
        None => (SyncAction::Upload, DecisionReason::New),
        Some(stored) => match stored.origin_updated_usec() {
            // Object written without the origin timestamp (or by something
            // else entirely). Re-upload to repair the metadata.
            None => (SyncAction::Upload, DecisionReason::Updated),
            Some(stored_usec) if item.updated_usec > stored_usec => {
                (SyncAction::Upload, DecisionReason::Updated)
            }
            Some(_) => (SyncAction::Skip, DecisionReason::Unchanged),
        },
    };

    SyncDecision {
        item: item.clone(),
        key,
        action,
        reason,
    }
}
