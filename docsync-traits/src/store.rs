//! Object Store Abstraction
//!
//! Capability to enumerate previously synced objects and write new ones.
//! The origin last-modified timestamp travels in per-object metadata so the
//! next run can diff against content freshness rather than store write time.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::error::Result;

/// Metadata key carrying the origin last-modified time, microseconds since
/// the Unix epoch. Load-bearing for change detection.
pub const META_ORIGIN_UPDATED_USEC: &str = "origin-updated-usec";
/// Origin last-modified time as ISO-8601, diagnostic only.
pub const META_ORIGIN_UPDATED_AT: &str = "origin-updated-at";
/// Item title at upload time.
pub const META_TITLE: &str = "title";
/// Source item id.
pub const META_ITEM_ID: &str = "item-id";
/// Source author id.
pub const META_AUTHOR_ID: &str = "author-id";
/// Correlation id of the run that wrote the object.
pub const META_SYNC_RUN_ID: &str = "sync-run-id";
/// Wall-clock upload time as ISO-8601.
pub const META_SYNCED_AT: &str = "synced-at";

/// One object currently present in the store.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,

    /// Timestamp assigned by the store at write time. Unrelated to content
    /// freshness; never used for change detection.
    pub last_modified: DateTime<Utc>,

    pub size: u64,

    pub content_hash: Option<String>,

    /// User metadata written alongside the object.
    pub metadata: HashMap<String, String>,
}

impl StoredObject {
    /// Origin timestamp recorded at upload time, if the object was written
    /// by the engine (or anything else that set the metadata entry).
    pub fn origin_updated_usec(&self) -> Option<i64> {
        self.metadata.get(META_ORIGIN_UPDATED_USEC)?.parse().ok()
    }
}

/// One page of an object listing.
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    pub objects: Vec<StoredObject>,
    /// Continuation token for the next page; `None` when exhausted.
    pub next_token: Option<String>,
}

/// Capability to read and write the target object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List one page of stored objects.
    ///
    /// Pass `None` for the first page, then the previous page's
    /// `next_token` until it comes back `None`.
    async fn list_objects_page(&self, continuation: Option<String>) -> Result<ObjectPage>;

    /// Write an object with user metadata, overwriting any existing object
    /// at the same key.
    async fn put_object(
        &self,
        key: &str,
        content: Bytes,
        metadata: HashMap<String, String>,
    ) -> Result<()>;
}
