//! Run-scoped data model
//!
//! Typed records with a lifetime of exactly one engine invocation. Nothing
//! here is persisted.

use docsync_traits::Item;
use serde::Serialize;

/// One folder visited during discovery.
#[derive(Debug, Clone)]
pub struct FolderNode {
    pub id: String,
    pub child_folder_ids: Vec<String>,
    pub child_item_ids: Vec<String>,
}

/// Per-item verdict of the diff step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Upload,
    Skip,
}

/// Why an item got its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// No stored object exists for the item's key
    New,
    /// Origin timestamp is newer than the one recorded in the store
    Updated,
    /// Stored copy is current
    Unchanged,
    /// Non-document kind; never uploaded
    NonDocument,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::New => "new",
            DecisionReason::Updated => "updated",
            DecisionReason::Unchanged => "unchanged",
            DecisionReason::NonDocument => "non-document kind",
        }
    }
}

/// Ephemeral per-item sync verdict, computed once per run.
#[derive(Debug, Clone)]
pub struct SyncDecision {
    pub item: Item,
    /// Storage key derived from the item's link value
    pub key: String,
    pub action: SyncAction,
    pub reason: DecisionReason,
}

/// Which half of the fetch-then-store cycle failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Fetch,
    Store,
}

/// One recorded per-item failure. Never fatal to the run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncFailure {
    pub item_id: String,
    pub kind: FailureKind,
    pub message: String,
}
