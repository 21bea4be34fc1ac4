//! Batched metadata collection
//!
//! Turns the flat id set from discovery into full item metadata, one batch
//! request per chunk of ids. Ids the source no longer knows about fall out
//! of the result silently; a deleted document is not an error.

use std::collections::HashMap;

use docsync_traits::{DocumentSource, Item, RetryPolicy, with_backoff};
use tracing::{debug, warn};

use crate::error::{Result, SyncError};

/// Fetch metadata for every id in `item_ids`, chunked to the source's batch
/// limit.
///
/// A chunk that fails after retries is logged and dropped; its items simply
/// miss this run and are picked up by the next one. Only when every chunk
/// fails is the run aborted, since that means the source is effectively
/// unreachable.
pub async fn collect(
    source: &dyn DocumentSource,
    item_ids: &[String],
    retry: &RetryPolicy,
) -> Result<HashMap<String, Item>> {
    let mut items = HashMap::with_capacity(item_ids.len());
    if item_ids.is_empty() {
        return Ok(items);
    }

    let batch_size = source.max_metadata_batch_size().max(1);
    let mut chunks_failed = 0usize;
    let mut chunks_total = 0usize;

    for chunk in item_ids.chunks(batch_size) {
        chunks_total += 1;
        match with_backoff(retry, || source.fetch_item_metadata_batch(chunk)).await {
            Ok(batch) => {
                debug!(requested = chunk.len(), resolved = batch.len(), "Metadata batch fetched");
                items.extend(batch);
            }
            Err(e) => {
                warn!(requested = chunk.len(), error = %e, "Metadata batch failed, skipping");
                chunks_failed += 1;
            }
        }
    }

    if chunks_failed == chunks_total {
        return Err(SyncError::SourceUnavailable(format!(
            "All {chunks_total} metadata batches failed"
        )));
    }

    Ok(items)
}
