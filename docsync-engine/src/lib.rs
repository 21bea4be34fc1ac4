//! # Synchronization Engine
//!
//! Incremental, one-way synchronization of documents from a nested folder
//! hierarchy into an object store.
//!
//! ## Overview
//!
//! One invocation of [`SyncEngine::run`] performs a single pass:
//!
//! 1. **Discovery** (`discovery`): depth-first traversal of the folder tree,
//!    cycle-safe, producing the deduplicated set of reachable item ids
//! 2. **Metadata collection** (`metadata`): chunked batch fetch of item
//!    metadata; ids deleted in the meantime drop out silently
//! 3. **Inventory listing** (`inventory`): full paginated listing of stored
//!    objects, continuation tokens followed transparently
//! 4. **Change detection** (`diff`): per-item Upload/Skip verdicts based on
//!    the origin timestamp recorded in object metadata
//! 5. **Sync driving** (`driver`): bounded-concurrency fetch-then-store for
//!    every Upload verdict, each item's failure isolated from its siblings
//!
//! All intermediate state is rebuilt from scratch every run and discarded
//! with the returned [`SyncResult`]. Nothing persists between invocations.
//!
//! ## Components
//!
//! - **Engine** (`engine`): orchestrates the pass and owns the run id
//! - **Config** (`config`): root folders, concurrency bound, retry policy
//! - **Result Aggregation** (`result`): counts and ordered failure records

pub mod config;
pub mod diff;
pub mod discovery;
pub mod driver;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod key;
pub mod metadata;
pub mod model;
pub mod result;

pub use config::SyncConfig;
pub use engine::SyncEngine;
pub use error::{Result, SyncError};
pub use key::storage_key;
pub use model::{DecisionReason, FailureKind, FolderNode, SyncAction, SyncDecision, SyncFailure};
pub use result::SyncResult;
