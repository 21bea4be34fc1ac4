//! Stored object inventory
//!
//! Builds the complete key-to-object map of what the store already holds.
//! Unlike discovery and metadata collection, a failure here is fatal: an
//! incomplete inventory would make every missing object look new and
//! trigger a mass re-upload.

use std::collections::HashMap;

use docsync_traits::{ObjectStore, RetryPolicy, StoredObject, with_backoff};
use tracing::debug;

use crate::error::{Result, SyncError};

/// List every stored object, following continuation tokens until exhausted.
pub async fn list_all(
    store: &dyn ObjectStore,
    retry: &RetryPolicy,
) -> Result<HashMap<String, StoredObject>> {
    let mut inventory = HashMap::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = with_backoff(retry, || store.list_objects_page(token.clone()))
            .await
            .map_err(|e| SyncError::StoreUnavailable(format!("Inventory listing failed: {e}")))?;

        pages += 1;
        for object in page.objects {
            inventory.insert(object.key.clone(), object);
        }

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    debug!(objects = inventory.len(), pages, "Inventory listed");
    Ok(inventory)
}
