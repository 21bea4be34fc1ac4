//! Run result aggregation

use serde::Serialize;

use crate::model::SyncFailure;

/// Summary of one completed engine run.
///
/// Counts are aggregated by a single consumer of the driver's completion
/// stream, so they are exact even under concurrent uploads. Failures are
/// recorded in completion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncResult {
    /// Unique items reachable from the root folders
    pub total_discovered: usize,
    /// Items of document kind that entered change detection
    pub documents_eligible: usize,
    /// Items skipped because of their kind
    pub non_documents_skipped: usize,
    /// Items fetched and stored this run
    pub uploaded: usize,
    /// Items whose stored copy was already current
    pub unchanged: usize,
    /// Per-item failures, in completion order
    pub failed: Vec<SyncFailure>,
    /// Wall-clock duration of the run
    pub duration_seconds: f64,
}

impl SyncResult {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Percentage of attempted uploads that succeeded. A run with nothing
    /// to upload counts as fully successful.
    pub fn success_rate(&self) -> f64 {
        let attempted = self.uploaded + self.failed.len();
        if attempted == 0 {
            return 100.0;
        }
        (self.uploaded as f64 / attempted as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FailureKind;

    #[test]
    fn test_empty_run_is_fully_successful() {
        let result = SyncResult::default();
        assert!(!result.has_failures());
        assert_eq!(result.success_rate(), 100.0);
    }

    #[test]
    fn test_success_rate_counts_attempts_only() {
        let result = SyncResult {
            uploaded: 3,
            unchanged: 10,
            failed: vec![SyncFailure {
                item_id: "t1".into(),
                kind: FailureKind::Store,
                message: "disk full".into(),
            }],
            ..Default::default()
        };
        assert!(result.has_failures());
        assert_eq!(result.success_rate(), 75.0);
    }
}
