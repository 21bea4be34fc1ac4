//! Filesystem-backed object store
//!
//! Stores each object as a plain file under a root directory, with a JSON
//! sidecar next to it carrying the user metadata and content hash. Keys map
//! onto relative paths, so the layout stays inspectable with ordinary
//! shell tools.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use docsync_traits::{
    error::{ConnectorError, Result},
    store::{ObjectPage, ObjectStore, StoredObject},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Sidecar file suffix. Files with this suffix never appear as objects.
const SIDECAR_SUFFIX: &str = ".meta.json";

/// Default listing page size
const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Serialize, Deserialize)]
struct Sidecar {
    metadata: HashMap<String, String>,
    content_hash: String,
}

/// Object store over a local directory tree.
pub struct FsObjectStore {
    root: PathBuf,
    page_size: usize,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Resolve a key to a path under the root, rejecting anything that
    /// could escape it.
    fn resolve(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.ends_with(SIDECAR_SUFFIX) {
            return Err(ConnectorError::StoreUnavailable(format!(
                "Invalid object key: {:?}",
                key
            )));
        }
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return Err(ConnectorError::StoreUnavailable(format!(
                    "Invalid object key: {:?}",
                    key
                )));
            }
        }
        Ok(self.root.join(key))
    }

    fn sidecar_path(object_path: &Path) -> PathBuf {
        let mut name = object_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        name.push_str(SIDECAR_SUFFIX);
        object_path.with_file_name(name)
    }

    /// Collect the sorted keys of every object under the root.
    async fn all_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut stack = vec![self.root.clone()];

        while let Some(dir) = stack.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                // A root that does not exist yet is just an empty store.
                Err(e) if dir == self.root && e.kind() == std::io::ErrorKind::NotFound => {
                    return Ok(keys);
                }
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    stack.push(path);
                } else if !path.to_string_lossy().ends_with(SIDECAR_SUFFIX) {
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        keys.push(relative.to_string_lossy().replace('\\', "/"));
                    }
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn load_object(&self, key: &str) -> Result<StoredObject> {
        let path = self.resolve(key)?;
        let fs_metadata = tokio::fs::metadata(&path).await?;
        let last_modified: DateTime<Utc> = fs_metadata
            .modified()
            .map(DateTime::from)
            .unwrap_or_else(|_| Utc::now());

        let sidecar_path = Self::sidecar_path(&path);
        let (metadata, content_hash) = match tokio::fs::read(&sidecar_path).await {
            Ok(raw) => match serde_json::from_slice::<Sidecar>(&raw) {
                Ok(sidecar) => (sidecar.metadata, Some(sidecar.content_hash)),
                Err(e) => {
                    warn!(key = %key, error = %e, "Unreadable sidecar, treating object as bare");
                    (HashMap::new(), None)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (HashMap::new(), None),
            Err(e) => return Err(e.into()),
        };

        Ok(StoredObject {
            key: key.to_string(),
            last_modified,
            size: fs_metadata.len(),
            content_hash,
            metadata,
        })
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn list_objects_page(&self, continuation: Option<String>) -> Result<ObjectPage> {
        let keys = self.all_keys().await?;

        let start = match &continuation {
            None => 0,
            Some(after) => keys
                .iter()
                .position(|k| k.as_str() > after.as_str())
                .unwrap_or(keys.len()),
        };
        let page_keys = &keys[start..(start + self.page_size).min(keys.len())];

        let mut objects = Vec::with_capacity(page_keys.len());
        for key in page_keys {
            objects.push(self.load_object(key).await?);
        }

        let next_token = if start + page_keys.len() < keys.len() {
            objects.last().map(|o| o.key.clone())
        } else {
            None
        };

        debug!(objects = objects.len(), more = next_token.is_some(), "Listed object page");
        Ok(ObjectPage {
            objects,
            next_token,
        })
    }

    async fn put_object(
        &self,
        key: &str,
        content: Bytes,
        metadata: HashMap<String, String>,
    ) -> Result<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content_hash = format!("{:x}", Sha256::digest(&content));
        let sidecar = Sidecar {
            metadata,
            content_hash,
        };
        let sidecar_json = serde_json::to_vec_pretty(&sidecar)
            .map_err(|e| ConnectorError::StoreUnavailable(format!("Sidecar encoding: {}", e)))?;

        tokio::fs::write(&path, &content).await?;
        tokio::fs::write(Self::sidecar_path(&path), sidecar_json).await?;

        debug!(key = %key, bytes = content.len(), "Stored object");
        Ok(())
    }
}
