//! docsync command-line entry point
//!
//! Reads its configuration from the environment, runs one synchronization
//! pass and prints the run summary as JSON on stdout.
//!
//! Environment:
//!
//! - `DOCSYNC_ROOT_FOLDERS`  comma-separated root folder ids (required)
//! - `QUILL_ACCESS_TOKEN`    API access token (required)
//! - `QUILL_BASE_URL`        API base URL (required)
//! - `DOCSYNC_STORE_DIR`     object store root directory (required)
//! - `DOCSYNC_MAX_CONCURRENT` concurrent uploads, default 4
//! - `RUST_LOG`              log filter, default `info`

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use docsync_bridge::{FsObjectStore, ReqwestHttpClient};
use docsync_engine::{SyncConfig, SyncEngine};
use docsync_traits::{DocumentSource, ObjectStore};
use provider_quill::QuillConnector;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Env {
    root_folder_ids: Vec<String>,
    access_token: String,
    base_url: String,
    store_dir: String,
    max_concurrent: usize,
}

fn required(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("Environment variable {name} must be set and non-empty"),
    }
}

fn load_env() -> Result<Env> {
    let roots = required("DOCSYNC_ROOT_FOLDERS")?;
    let root_folder_ids: Vec<String> = roots
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if root_folder_ids.is_empty() {
        bail!("DOCSYNC_ROOT_FOLDERS must contain at least one folder id");
    }

    let max_concurrent = match std::env::var("DOCSYNC_MAX_CONCURRENT") {
        Ok(value) => value
            .parse::<usize>()
            .with_context(|| format!("DOCSYNC_MAX_CONCURRENT is not a number: {value:?}"))?,
        Err(_) => 4,
    };

    Ok(Env {
        root_folder_ids,
        access_token: required("QUILL_ACCESS_TOKEN")?,
        base_url: required("QUILL_BASE_URL")?,
        store_dir: required("DOCSYNC_STORE_DIR")?,
        max_concurrent,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let env = load_env()?;

    let http_client = Arc::new(ReqwestHttpClient::new());
    let source: Arc<dyn DocumentSource> = Arc::new(QuillConnector::new(
        http_client,
        env.base_url,
        env.access_token,
    ));
    let store: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(&env.store_dir));

    let mut config = SyncConfig::new(env.root_folder_ids);
    config.max_concurrent_uploads = env.max_concurrent;

    let engine = SyncEngine::new(source, store, config);
    info!(run_id = %engine.run_id(), store_dir = %env.store_dir, "Starting sync");

    let result = engine.run().await.context("Sync run failed")?;

    // Per-item failures are reported in the summary, not via the exit code;
    // a partially failed run still made progress worth keeping.
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
