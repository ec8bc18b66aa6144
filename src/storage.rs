use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::firestore::FirestoreStore;
use crate::models::YearDocument;
use async_trait::async_trait;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::{fs, sync::Mutex};

pub const YEARS_COLLECTION: &str = "years";

/// Keyed document storage for the `years` collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `Ok(None)` when no document exists under `id`.
    async fn get(&self, id: &str) -> Result<Option<YearDocument>, StoreError>;

    /// Replaces the whole document under `id`.
    async fn set(&self, id: &str, document: &YearDocument) -> Result<(), StoreError>;
}

pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    Ok(match config {
        StoreConfig::Firestore(firestore) => Arc::new(FirestoreStore::new(firestore.clone())?),
        StoreConfig::File { data_dir } => Arc::new(FileStore::new(data_dir.clone())),
        StoreConfig::Memory => Arc::new(MemoryStore::default()),
    })
}

/// One pretty-printed JSON file per document under `<root>/years/`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn document_path(&self, id: &str) -> PathBuf {
        self.root.join(YEARS_COLLECTION).join(format!("{id}.json"))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn get(&self, id: &str) -> Result<Option<YearDocument>, StoreError> {
        read_document(&self.document_path(id)).await
    }

    async fn set(&self, id: &str, document: &YearDocument) -> Result<(), StoreError> {
        let path = self.document_path(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_vec_pretty(document)?;
        fs::write(&path, payload).await?;
        Ok(())
    }
}

async fn read_document(path: &Path) -> Result<Option<YearDocument>, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, YearDocument>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<YearDocument>, StoreError> {
        Ok(self.documents.lock().await.get(id).cloned())
    }

    async fn set(&self, id: &str, document: &YearDocument) -> Result<(), StoreError> {
        self.documents
            .lock()
            .await
            .insert(id.to_string(), document.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
