use thiserror::Error;

/// Fatal, run-level errors.
///
/// Per-item fetch and store failures never appear here; they are recorded in
/// [`SyncResult::failed`](crate::result::SyncResult) and the run continues.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Invalid or missing configuration. Aborts before any discovery.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Source API unreachable before any usable progress was made.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Store listing or writing failed systemically. Listing failure is
    /// always fatal: there is no safe diff without a baseline inventory.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Every root folder was inaccessible.
    #[error("Discovery failed for all {roots} root folders")]
    DiscoveryFailed { roots: usize },
}

pub type Result<T> = std::result::Result<T, SyncError>;
