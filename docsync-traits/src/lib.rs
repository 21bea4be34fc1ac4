//! # Collaborator Contracts
//!
//! Traits that connect the synchronization engine to the outside world.
//!
//! ## Overview
//!
//! The engine never talks to a concrete service. It depends on two
//! capabilities, each expressed as an async trait:
//!
//! - [`DocumentSource`](source::DocumentSource) - list folder children,
//!   batch-fetch item metadata, fetch document content
//! - [`ObjectStore`](store::ObjectStore) - enumerate stored objects page by
//!   page, write an object with metadata
//!
//! Concrete connectors (the Quill REST connector, the filesystem object
//! store) live in their own crates and implement these traits. HTTP-backed
//! connectors additionally build on the [`HttpClient`](http::HttpClient)
//! abstraction so they can be driven by a mock transport in tests.
//!
//! ## Error Handling
//!
//! Every trait method returns [`ConnectorError`](error::ConnectorError).
//! Implementations should convert service-specific failures into the
//! matching variant so the engine can tell transient transport trouble from
//! permanent errors.
//!
//! ## Retry
//!
//! [`RetryPolicy`](retry::RetryPolicy) and
//! [`with_backoff`](retry::with_backoff) provide the single backoff policy
//! applied uniformly to source and store calls.

pub mod error;
pub mod http;
pub mod retry;
pub mod source;
pub mod store;

pub use error::{ConnectorError, Result};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use retry::{with_backoff, RetryPolicy};
pub use source::{DocumentSource, FolderChildren, Item, ItemKind};
pub use store::{
    ObjectPage, ObjectStore, StoredObject, META_AUTHOR_ID, META_ITEM_ID, META_ORIGIN_UPDATED_AT,
    META_ORIGIN_UPDATED_USEC, META_SYNCED_AT, META_SYNC_RUN_ID, META_TITLE,
};
