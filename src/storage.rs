use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Context;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::LoadError;

/// Whole-document persistence. Every mutation is a full load, modify, save.
#[async_trait]
pub trait JsonStore<T>: Send + Sync {
    async fn load(&self) -> Result<T, LoadError>;
    async fn save(&self, doc: &T) -> anyhow::Result<()>;
}

/// Load the document, treating a missing source as an empty one.
pub async fn load_or_default<T: Default>(store: &dyn JsonStore<T>) -> Result<T, LoadError> {
    match store.load().await {
        Ok(doc) => Ok(doc),
        Err(LoadError::Missing(src)) => {
            debug!(source = %src, "data source missing, starting empty");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

/// JSON file on disk.
pub struct FileStore<T> {
    path: PathBuf,
    _doc: PhantomData<fn() -> T>,
}

impl<T> FileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _doc: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T> JsonStore<T> for FileStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> Result<T, LoadError> {
        let path = self.path.display().to_string();
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(LoadError::Missing(path)),
            Err(source) => return Err(LoadError::Io { path, source }),
        };
        serde_json::from_slice(&raw).map_err(|source| LoadError::Malformed { path, source })
    }

    async fn save(&self, doc: &T) -> anyhow::Result<()> {
        let body = serde_json::to_vec_pretty(doc).context("serialize document")?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        tokio::fs::write(&self.path, body)
            .await
            .with_context(|| format!("write {}", self.path.display()))?;
        debug!(path = %self.path.display(), "document saved");
        Ok(())
    }
}

/// In-process store used by tests and `AppState::fake`.
pub struct MemoryStore<T> {
    doc: Mutex<Option<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new(doc: T) -> Self {
        Self {
            doc: Mutex::new(Some(doc)),
        }
    }

    /// A store whose `load` reports a missing source until the first save.
    pub fn empty() -> Self {
        Self {
            doc: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<T> JsonStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<T, LoadError> {
        let guard = self.doc.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .clone()
            .ok_or_else(|| LoadError::Missing("memory".into()))
    }

    async fn save(&self, doc: &T) -> anyhow::Result<()> {
        let mut guard = self.doc.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(doc.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        items: Vec<u32>,
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::<Doc>::new(dir.path().join("nested/doc.json"));
        let doc = Doc { items: vec![1, 2, 3] };
        store.save(&doc).await.expect("save");
        assert_eq!(store.load().await.expect("load"), doc);
    }

    #[tokio::test]
    async fn file_store_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::<Doc>::new(dir.path().join("absent.json"));
        let err = store.load().await.unwrap_err();
        assert!(err.is_missing());
    }

    #[tokio::test]
    async fn file_store_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{ \"items\": [1, ").unwrap();
        let store = FileStore::<Doc>::new(&path);
        match store.load().await {
            Err(LoadError::Malformed { path: p, .. }) => assert!(p.ends_with("broken.json")),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_or_default_only_forgives_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileStore::<Doc>::new(dir.path().join("absent.json"));
        assert_eq!(load_or_default(&missing).await.unwrap(), Doc::default());

        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"not json").unwrap();
        let broken = FileStore::<Doc>::new(&path);
        assert!(load_or_default(&broken).await.is_err());
    }

    #[tokio::test]
    async fn memory_store_starts_missing_until_saved() {
        let store = MemoryStore::<Doc>::empty();
        assert!(store.load().await.unwrap_err().is_missing());
        store.save(&Doc { items: vec![7] }).await.unwrap();
        assert_eq!(store.load().await.unwrap().items, vec![7]);
    }
}
