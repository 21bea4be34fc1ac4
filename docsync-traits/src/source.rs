//! Document Source Abstraction
//!
//! Capability to enumerate a folder hierarchy and fetch item metadata and
//! content from a remote document-collaboration service.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::error::Result;

/// Kind of a syncable item. Only documents are ever uploaded; spreadsheets
/// and anything unrecognized are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Document,
    Spreadsheet,
    Other,
}

impl ItemKind {
    pub fn is_document(&self) -> bool {
        matches!(self, ItemKind::Document)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Document => "document",
            ItemKind::Spreadsheet => "spreadsheet",
            ItemKind::Other => "other",
        }
    }
}

/// Metadata for one item in the source hierarchy.
///
/// Created when metadata is batch-fetched, immutable, discarded when the
/// run ends.
#[derive(Debug, Clone)]
pub struct Item {
    /// Opaque identifier, unique within the source
    pub id: String,

    /// Human-readable title; may contain characters unsafe for storage keys
    pub title: String,

    pub kind: ItemKind,

    /// Stable identifier distinct from `id`, unique across all items ever
    /// observed from the source. Sole basis for the storage key.
    pub link_value: String,

    /// Last-modified time reported by the origin system, microseconds since
    /// the Unix epoch.
    pub updated_usec: i64,

    /// Opaque author identifier, informational only
    pub author_id: String,
}

impl Item {
    /// Origin last-modified time as a UTC timestamp.
    ///
    /// Returns `None` for timestamps outside the representable range.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.updated_usec)
    }
}

/// One folder's direct children, in the order the source returned them.
#[derive(Debug, Clone, Default)]
pub struct FolderChildren {
    pub child_folder_ids: Vec<String>,
    pub child_item_ids: Vec<String>,
}

/// Capability to read the remote document hierarchy.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// List the direct children of a folder.
    async fn list_folder_children(&self, folder_id: &str) -> Result<FolderChildren>;

    /// Fetch metadata for a batch of item ids.
    ///
    /// Ids the source cannot resolve are simply absent from the result,
    /// never an error. Callers must not exceed
    /// [`max_metadata_batch_size`](DocumentSource::max_metadata_batch_size)
    /// ids per call.
    async fn fetch_item_metadata_batch(&self, ids: &[String]) -> Result<HashMap<String, Item>>;

    /// Fetch the full content of one item. Only called for documents.
    async fn fetch_item_content(&self, id: &str) -> Result<Bytes>;

    /// Maximum number of ids accepted by a single metadata batch call.
    fn max_metadata_batch_size(&self) -> usize {
        100
    }
}
