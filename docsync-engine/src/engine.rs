//! Sync engine orchestration

use std::sync::Arc;
use std::time::Instant;

use docsync_traits::{DocumentSource, ObjectStore};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::error::Result;
use crate::model::{DecisionReason, SyncAction};
use crate::result::SyncResult;
use crate::{diff, discovery, driver, inventory, metadata};

/// One-way document synchronization engine.
///
/// Stateless between runs: every call to [`run`](SyncEngine::run) rebuilds
/// its view of both sides from scratch, so a crashed or partial run needs
/// no recovery beyond running again.
pub struct SyncEngine {
    source: Arc<dyn DocumentSource>,
    store: Arc<dyn ObjectStore>,
    config: SyncConfig,
    run_id: Uuid,
}

impl SyncEngine {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        store: Arc<dyn ObjectStore>,
        config: SyncConfig,
    ) -> Self {
        Self {
            source,
            store,
            config,
            run_id: Uuid::new_v4(),
        }
    }

    /// Correlation id stamped on log lines and uploaded object metadata.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Execute one full synchronization pass.
    #[instrument(skip(self), fields(run_id = %self.run_id))]
    pub async fn run(&self) -> Result<SyncResult> {
        self.config.validate()?;
        let started = Instant::now();
        let retry = &self.config.retry;

        let discovered = discovery::discover(
            self.source.as_ref(),
            &self.config.root_folder_ids,
            retry,
        )
        .await?;
        info!(
            folders = discovered.folders_visited(),
            items = discovered.item_ids.len(),
            "Discovery finished"
        );

        let items = metadata::collect(self.source.as_ref(), &discovered.item_ids, retry).await?;
        let stored = inventory::list_all(self.store.as_ref(), retry).await?;
        let decisions = diff::plan(&items, &stored);

        let mut result = SyncResult {
            total_discovered: discovered.item_ids.len(),
            ..Default::default()
        };

        let mut uploads = Vec::new();
        for decision in decisions {
            match decision.reason {
                DecisionReason::NonDocument => result.non_documents_skipped += 1,
                DecisionReason::Unchanged => {
                    result.documents_eligible += 1;
                    result.unchanged += 1;
                }
                DecisionReason::New | DecisionReason::Updated => {
                    result.documents_eligible += 1;
                }
            }
            if decision.action == SyncAction::Upload {
                uploads.push(decision);
            }
        }

        info!(
            eligible = result.documents_eligible,
            to_upload = uploads.len(),
            unchanged = result.unchanged,
            "Change detection finished"
        );

        driver::drive(
            &self.source,
            &self.store,
            uploads,
            retry,
            self.config.max_concurrent_uploads,
            self.run_id,
            &mut result,
        )
        .await;

        result.duration_seconds = started.elapsed().as_secs_f64();
        info!(
            uploaded = result.uploaded,
            failed = result.failed.len(),
            duration_seconds = result.duration_seconds,
            success_rate = result.success_rate(),
            "Sync run complete"
        );

        Ok(result)
    }
}
