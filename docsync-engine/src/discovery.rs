//! Folder tree discovery
//!
//! Depth-first traversal of the folder hierarchy starting from the
//! configured roots. The visited set makes the traversal terminate on
//! cyclic or diamond-shaped folder graphs; each folder is listed exactly
//! once regardless of how many parents reference it.

use std::collections::HashSet;

use docsync_traits::{DocumentSource, RetryPolicy, with_backoff};
use tracing::{debug, warn};

use crate::error::{Result, SyncError};
use crate::model::FolderNode;

/// Everything discovery learned about the tree.
#[derive(Debug, Default)]
pub struct DiscoveryOutcome {
    /// Unique item ids, in first-seen traversal order
    pub item_ids: Vec<String>,
    /// Folders successfully listed
    pub folders: Vec<FolderNode>,
    /// Folders that could not be listed after retries
    pub folders_failed: usize,
}

impl DiscoveryOutcome {
    pub fn folders_visited(&self) -> usize {
        self.folders.len() + self.folders_failed
    }
}

/// Traverse the folder tree under `roots` and collect reachable item ids.
///
/// A folder that fails to list after retries is logged and skipped; its
/// subtree is simply not explored. Only when every distinct root fails is
/// the whole run aborted, since an empty traversal would otherwise look
/// like an empty source.
pub async fn discover(
    source: &dyn DocumentSource,
    roots: &[String],
    retry: &RetryPolicy,
) -> Result<DiscoveryOutcome> {
    let mut outcome = DiscoveryOutcome::default();
    let mut visited: HashSet<String> = HashSet::new();
    let mut seen_items: HashSet<String> = HashSet::new();
    let mut stack: Vec<String> = Vec::new();

    let unique_roots: Vec<&String> = {
        let mut seen = HashSet::new();
        roots.iter().filter(|id| seen.insert(id.as_str())).collect()
    };
    let mut roots_failed = 0usize;

    // Push roots in reverse so the first configured root is explored first.
    for root in unique_roots.iter().rev() {
        stack.push((*root).clone());
    }

    while let Some(folder_id) = stack.pop() {
        if !visited.insert(folder_id.clone()) {
            debug!(folder_id = %folder_id, "Skipping already-visited folder");
            continue;
        }

        let listing = with_backoff(retry, || source.list_folder_children(&folder_id)).await;

        let children = match listing {
            Ok(children) => children,
            Err(e) => {
                warn!(folder_id = %folder_id, error = %e, "Failed to list folder, skipping subtree");
                outcome.folders_failed += 1;
                if unique_roots.iter().any(|r| **r == folder_id) {
                    roots_failed += 1;
                }
                continue;
            }
        };

        for item_id in &children.child_item_ids {
            if seen_items.insert(item_id.clone()) {
                outcome.item_ids.push(item_id.clone());
            }
        }

        // Reverse push keeps subfolders in listed order on the stack.
        for child in children.child_folder_ids.iter().rev() {
            if !visited.contains(child) {
                stack.push(child.clone());
            }
        }

        outcome.folders.push(FolderNode {
            id: folder_id,
            child_folder_ids: children.child_folder_ids,
            child_item_ids: children.child_item_ids,
        });
    }

    if !unique_roots.is_empty() && roots_failed == unique_roots.len() {
        return Err(SyncError::DiscoveryFailed {
            roots: unique_roots.len(),
        });
    }

    debug!(
        folders = outcome.folders.len(),
        folders_failed = outcome.folders_failed,
        items = outcome.item_ids.len(),
        "Discovery complete"
    );

    Ok(outcome)
}
