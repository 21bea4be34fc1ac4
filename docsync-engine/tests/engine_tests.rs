//! End-to-end engine tests against in-memory source and store fakes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use docsync_engine::{SyncConfig, SyncEngine};
use docsync_traits::{
    ConnectorError, DocumentSource, FolderChildren, Item, ItemKind, ObjectPage, ObjectStore,
    RetryPolicy, StoredObject, META_ORIGIN_UPDATED_USEC, META_TITLE,
};

const T: i64 = 1_700_000_000_000_000;

/// In-memory folder tree plus item metadata and content.
#[derive(Default)]
struct FakeSource {
    folders: HashMap<String, FolderChildren>,
    items: Mutex<HashMap<String, Item>>,
    failing_content_ids: Vec<String>,
    content_fetches: AtomicUsize,
}

impl FakeSource {
    fn with_folder(mut self, id: &str, subfolders: &[&str], items: &[&str]) -> Self {
        self.folders.insert(
            id.to_string(),
            FolderChildren {
                child_folder_ids: subfolders.iter().map(|s| s.to_string()).collect(),
                child_item_ids: items.iter().map(|s| s.to_string()).collect(),
            },
        );
        self
    }

    fn with_item(self, id: &str, kind: ItemKind, updated_usec: i64) -> Self {
        self.insert_item(id, kind, updated_usec);
        self
    }

    fn insert_item(&self, id: &str, kind: ItemKind, updated_usec: i64) {
        self.items.lock().unwrap().insert(
            id.to_string(),
            Item {
                id: id.to_string(),
                title: format!("Title {id}"),
                kind,
                link_value: format!("quill.example.com/{id}"),
                updated_usec,
                author_id: "u1".into(),
            },
        );
    }

    fn touch(&self, id: &str, updated_usec: i64) {
        let mut items = self.items.lock().unwrap();
        let item = items.get_mut(id).unwrap();
        item.updated_usec = updated_usec;
    }

    fn retitle(&self, id: &str, title: &str) {
        let mut items = self.items.lock().unwrap();
        items.get_mut(id).unwrap().title = title.to_string();
    }
}

#[async_trait]
impl DocumentSource for FakeSource {
    async fn list_folder_children(
        &self,
        folder_id: &str,
    ) -> docsync_traits::Result<FolderChildren> {
        self.folders
            .get(folder_id)
            .cloned()
            .ok_or_else(|| ConnectorError::NotFound(folder_id.to_string()))
    }

    async fn fetch_item_metadata_batch(
        &self,
        ids: &[String],
    ) -> docsync_traits::Result<HashMap<String, Item>> {
        let items = self.items.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| items.get(id).map(|i| (id.clone(), i.clone())))
            .collect())
    }

    async fn fetch_item_content(&self, id: &str) -> docsync_traits::Result<Bytes> {
        self.content_fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing_content_ids.iter().any(|f| f == id) {
            return Err(ConnectorError::SourceUnavailable(format!(
                "content fetch failed for {id}"
            )));
        }
        Ok(Bytes::from(format!("<html>{id}</html>")))
    }
}

/// In-memory object store with configurable listing page size.
struct FakeStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    page_size: usize,
    list_calls: AtomicUsize,
}

impl FakeStore {
    fn new(page_size: usize) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            page_size,
            list_calls: AtomicUsize::new(0),
        }
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn metadata_of(&self, key: &str) -> HashMap<String, String> {
        self.objects.lock().unwrap()[key].metadata.clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn list_objects_page(
        &self,
        continuation: Option<String>,
    ) -> docsync_traits::Result<ObjectPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let objects = self.objects.lock().unwrap();
        let mut keys: Vec<&String> = objects.keys().collect();
        keys.sort();

        let start = match &continuation {
            None => 0,
            Some(after) => keys.iter().position(|k| *k > after).unwrap_or(keys.len()),
        };
        let page: Vec<StoredObject> = keys[start..]
            .iter()
            .take(self.page_size)
            .map(|k| objects[*k].clone())
            .collect();
        let next_token = if start + page.len() < keys.len() {
            page.last().map(|o| o.key.clone())
        } else {
            None
        };
        Ok(ObjectPage {
            objects: page,
            next_token,
        })
    }

    async fn put_object(
        &self,
        key: &str,
        content: Bytes,
        metadata: HashMap<String, String>,
    ) -> docsync_traits::Result<()> {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                key: key.to_string(),
                last_modified: Utc::now(),
                size: content.len() as u64,
                content_hash: None,
                metadata,
            },
        );
        Ok(())
    }
}

fn config(roots: &[&str]) -> SyncConfig {
    let mut config = SyncConfig::new(roots.iter().map(|s| s.to_string()).collect());
    config.retry = RetryPolicy {
        max_attempts: 1,
        ..Default::default()
    };
    config
}

fn engine(source: Arc<FakeSource>, store: Arc<FakeStore>, roots: &[&str]) -> SyncEngine {
    SyncEngine::new(source, store, config(roots))
}

#[tokio::test]
async fn test_first_run_uploads_everything() {
    let source = Arc::new(
        FakeSource::default()
            .with_folder("root", &["sub"], &["t1"])
            .with_folder("sub", &[], &["t2"])
            .with_item("t1", ItemKind::Document, T)
            .with_item("t2", ItemKind::Document, T),
    );
    let store = Arc::new(FakeStore::new(100));

    let result = engine(source, store.clone(), &["root"]).run().await.unwrap();

    assert_eq!(result.total_discovered, 2);
    assert_eq!(result.uploaded, 2);
    assert!(!result.has_failures());
    assert_eq!(
        store.keys(),
        vec!["quill.example.com/t1.html", "quill.example.com/t2.html"]
    );
    let metadata = store.metadata_of("quill.example.com/t1.html");
    assert_eq!(metadata[META_ORIGIN_UPDATED_USEC], T.to_string());
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let source = Arc::new(
        FakeSource::default()
            .with_folder("root", &[], &["t1", "t2"])
            .with_item("t1", ItemKind::Document, T)
            .with_item("t2", ItemKind::Document, T),
    );
    let store = Arc::new(FakeStore::new(100));

    let first = engine(source.clone(), store.clone(), &["root"]).run().await.unwrap();
    assert_eq!(first.uploaded, 2);

    let second = engine(source, store, &["root"]).run().await.unwrap();
    assert_eq!(second.uploaded, 0);
    assert_eq!(second.unchanged, 2);
    assert!(!second.has_failures());
}

#[tokio::test]
async fn test_cyclic_folders_terminate() {
    // root -> a -> b -> c -> root, plus a diamond edge b -> a.
    let source = Arc::new(
        FakeSource::default()
            .with_folder("root", &["a"], &["t1"])
            .with_folder("a", &["b"], &["t2"])
            .with_folder("b", &["c", "a"], &["t3"])
            .with_folder("c", &["root"], &["t4"])
            .with_item("t1", ItemKind::Document, T)
            .with_item("t2", ItemKind::Document, T)
            .with_item("t3", ItemKind::Document, T)
            .with_item("t4", ItemKind::Document, T),
    );
    let store = Arc::new(FakeStore::new(100));

    let result = engine(source, store, &["root"]).run().await.unwrap();

    assert_eq!(result.total_discovered, 4);
    assert_eq!(result.uploaded, 4);
}

#[tokio::test]
async fn test_non_documents_never_fetched() {
    let source = Arc::new(
        FakeSource::default()
            .with_folder("root", &[], &["doc", "sheet", "misc"])
            .with_item("doc", ItemKind::Document, T)
            .with_item("sheet", ItemKind::Spreadsheet, T)
            .with_item("misc", ItemKind::Other, T),
    );
    let store = Arc::new(FakeStore::new(100));

    let result = engine(source.clone(), store.clone(), &["root"]).run().await.unwrap();

    assert_eq!(result.uploaded, 1);
    assert_eq!(result.non_documents_skipped, 2);
    assert_eq!(result.documents_eligible, 1);
    // Content was only ever requested for the document.
    assert_eq!(source.content_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(store.keys(), vec!["quill.example.com/doc.html"]);
}

#[tokio::test]
async fn test_only_updated_items_reuploaded() {
    let source = Arc::new(
        FakeSource::default()
            .with_folder("root", &[], &["stale", "fresh", "brand_new"])
            .with_item("stale", ItemKind::Document, T)
            .with_item("fresh", ItemKind::Document, T),
    );
    let store = Arc::new(FakeStore::new(100));

    engine(source.clone(), store.clone(), &["root"]).run().await.unwrap();

    // Between runs: one item modified, one item created.
    source.touch("stale", T + 1);
    source.insert_item("brand_new", ItemKind::Document, T);

    let result = engine(source.clone(), store.clone(), &["root"]).run().await.unwrap();

    assert_eq!(result.uploaded, 2);
    assert_eq!(result.unchanged, 1);
    let metadata = store.metadata_of("quill.example.com/stale.html");
    assert_eq!(metadata[META_ORIGIN_UPDATED_USEC], (T + 1).to_string());
}

#[tokio::test]
async fn test_title_change_does_not_change_key() {
    let source = Arc::new(
        FakeSource::default()
            .with_folder("root", &[], &["t1"])
            .with_item("t1", ItemKind::Document, T),
    );
    let store = Arc::new(FakeStore::new(100));

    engine(source.clone(), store.clone(), &["root"]).run().await.unwrap();

    source.retitle("t1", "Renamed / Again?");
    source.touch("t1", T + 1);
    let result = engine(source, store.clone(), &["root"]).run().await.unwrap();

    // Same key overwritten, no orphan left behind.
    assert_eq!(result.uploaded, 1);
    assert_eq!(store.keys(), vec!["quill.example.com/t1.html"]);
    assert_eq!(
        store.metadata_of("quill.example.com/t1.html")[META_TITLE],
        "Renamed / Again?"
    );
}

#[tokio::test]
async fn test_item_failure_does_not_abort_run() {
    let mut source = FakeSource::default()
        .with_folder("root", &[], &["t1", "t2", "t3", "t4", "t5"]);
    for id in ["t1", "t2", "t3", "t4", "t5"] {
        source = source.with_item(id, ItemKind::Document, T);
    }
    source.failing_content_ids.push("t3".to_string());
    let source = Arc::new(source);
    let store = Arc::new(FakeStore::new(100));

    let result = engine(source, store.clone(), &["root"]).run().await.unwrap();

    assert_eq!(result.uploaded, 4);
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].item_id, "t3");
    assert_eq!(result.success_rate(), 80.0);
    assert_eq!(store.keys().len(), 4);
}

#[tokio::test]
async fn test_inventory_pagination_transparent() {
    let mut source = FakeSource::default();
    let ids: Vec<String> = (0..7).map(|i| format!("t{i}")).collect();
    let id_refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();
    source = source.with_folder("root", &[], &id_refs);
    for id in &ids {
        source = source.with_item(id, ItemKind::Document, T);
    }
    let source = Arc::new(source);
    // Three-object pages force multiple listing calls on the second run.
    let store = Arc::new(FakeStore::new(3));

    engine(source.clone(), store.clone(), &["root"]).run().await.unwrap();
    store.list_calls.store(0, Ordering::SeqCst);

    let second = engine(source, store.clone(), &["root"]).run().await.unwrap();

    assert_eq!(second.uploaded, 0);
    assert_eq!(second.unchanged, 7);
    assert!(store.list_calls.load(Ordering::SeqCst) >= 3);
}
