//! Sync driver
//!
//! Executes the Upload verdicts with bounded concurrency. Completions are
//! drained by this single task, so counters and the failure list never need
//! a lock. An item that fails after retries is recorded and the rest of the
//! batch keeps going; per-item failures never abort the run.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use docsync_traits::{
    DocumentSource, Item, ObjectStore, RetryPolicy, with_backoff, META_AUTHOR_ID, META_ITEM_ID,
    META_ORIGIN_UPDATED_AT, META_ORIGIN_UPDATED_USEC, META_SYNCED_AT, META_SYNC_RUN_ID, META_TITLE,
};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use crate::model::{FailureKind, SyncDecision, SyncFailure};
use crate::result::SyncResult;

/// Fetch and store every decision in `uploads`, at most `max_concurrent`
/// in flight, aggregating outcomes into `result`.
pub async fn drive(
    source: &Arc<dyn DocumentSource>,
    store: &Arc<dyn ObjectStore>,
    uploads: Vec<SyncDecision>,
    retry: &RetryPolicy,
    max_concurrent: usize,
    run_id: Uuid,
    result: &mut SyncResult,
) {
    let mut completions = stream::iter(uploads.into_iter().map(|decision| {
        let source = Arc::clone(source);
        let store = Arc::clone(store);
        async move { sync_one(&*source, &*store, decision, retry, run_id).await }
    }))
    .buffer_unordered(max_concurrent.max(1));

    while let Some(outcome) = completions.next().await {
        match outcome {
            Ok(key) => {
                info!(key = %key, "Uploaded");
                result.uploaded += 1;
            }
            Err(failure) => {
                warn!(item_id = %failure.item_id, kind = ?failure.kind, error = %failure.message, "Item sync failed");
                result.failed.push(failure);
            }
        }
    }
}

async fn sync_one(
    source: &dyn DocumentSource,
    store: &dyn ObjectStore,
    decision: SyncDecision,
    retry: &RetryPolicy,
    run_id: Uuid,
) -> std::result::Result<String, SyncFailure> {
    let item = &decision.item;

    let content = with_backoff(retry, || source.fetch_item_content(&item.id))
        .await
        .map_err(|e| SyncFailure {
            item_id: item.id.clone(),
            kind: FailureKind::Fetch,
            message: e.to_string(),
        })?;

    let metadata = upload_metadata(item, run_id);

    with_backoff(retry, || {
        store.put_object(&decision.key, content.clone(), metadata.clone())
    })
    .await
    .map_err(|e| SyncFailure {
        item_id: item.id.clone(),
        kind: FailureKind::Store,
        message: e.to_string(),
    })?;

    Ok(decision.key)
}

/// User metadata written with every uploaded object. The origin timestamp
/// entry is what the next run's change detection reads back.
fn upload_metadata(item: &Item, run_id: Uuid) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    metadata.insert(
        META_ORIGIN_UPDATED_USEC.to_string(),
        item.updated_usec.to_string(),
    );
    if let Some(at) = item.updated_at() {
        metadata.insert(META_ORIGIN_UPDATED_AT.to_string(), at.to_rfc3339());
    }
    metadata.insert(META_TITLE.to_string(), item.title.clone());
    metadata.insert(META_ITEM_ID.to_string(), item.id.clone());
    metadata.insert(META_AUTHOR_ID.to_string(), item.author_id.clone());
    metadata.insert(META_SYNC_RUN_ID.to_string(), run_id.to_string());
    metadata.insert(META_SYNCED_AT.to_string(), Utc::now().to_rfc3339());
    metadata
}
