//! Engine configuration

use docsync_traits::RetryPolicy;

use crate::error::{Result, SyncError};

/// Configuration for one engine invocation.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Root folder ids to discover from. Must be non-empty.
    pub root_folder_ids: Vec<String>,

    /// Maximum concurrent fetch/store operations in the sync driver.
    /// Bounded to respect source rate limits and the memory ceiling.
    pub max_concurrent_uploads: usize,

    /// Backoff policy applied uniformly to source and store calls.
    pub retry: RetryPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            root_folder_ids: Vec::new(),
            max_concurrent_uploads: 4,
            retry: RetryPolicy::default(),
        }
    }
}

impl SyncConfig {
    pub fn new(root_folder_ids: Vec<String>) -> Self {
        Self {
            root_folder_ids,
            ..Self::default()
        }
    }

    /// Validate before the run starts. Failures here abort with
    /// [`SyncError::Configuration`] before any discovery.
    pub fn validate(&self) -> Result<()> {
        if self.root_folder_ids.is_empty() {
            return Err(SyncError::Configuration(
                "At least one root folder id is required".to_string(),
            ));
        }

        if self.root_folder_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(SyncError::Configuration(
                "Root folder ids must be non-empty strings".to_string(),
            ));
        }

        if self.max_concurrent_uploads == 0 {
            return Err(SyncError::Configuration(
                "max_concurrent_uploads must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_roots_rejected() {
        let config = SyncConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("root folder"));
    }

    #[test]
    fn test_blank_root_rejected() {
        let config = SyncConfig::new(vec!["FOLDER1".into(), "  ".into()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = SyncConfig::new(vec!["FOLDER1".into()]);
        config.max_concurrent_uploads = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_config() {
        let config = SyncConfig::new(vec!["FOLDER1".into()]);
        assert!(config.validate().is_ok());
        assert_eq!(config.max_concurrent_uploads, 4);
    }
}
