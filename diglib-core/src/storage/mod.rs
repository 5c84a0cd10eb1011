//! Storage for book texts

use crate::content::pagination;
use crate::error::{Result, StorageError};
use crate::types::PagedContent;
use async_trait::async_trait;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Keyed store of UTF-8 book texts
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store `text` under `key`, replacing any previous text
    async fn put_text(&self, key: &str, text: &str) -> StorageResult<()>;

    /// Read the text stored under `key`
    async fn get_text(&self, key: &str) -> StorageResult<String>;

    /// Remove the text stored under `key`
    async fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Read one page of the text stored under `key`
pub async fn read_stored_page(
    store: &dyn ContentStore,
    key: &str,
    page_number: u32,
    page_size: NonZeroU32,
) -> Result<PagedContent> {
    let text = store.get_text(key).await?;
    let page = pagination::read_page(&text, page_number, page_size)?;
    Ok(page)
}

/// Texts stored as files below a root directory
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a key below the root, rejecting keys that would leave it
    fn full_path(&self, key: &str) -> StorageResult<PathBuf> {
        let mut normalized = PathBuf::new();
        for component in Path::new(key).components() {
            match component {
                Component::Normal(c) => normalized.push(c),
                Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(StorageError::BackendError(format!(
                        "Key escapes storage root: {}",
                        key
                    )));
                }
            }
        }
        if normalized.as_os_str().is_empty() {
            return Err(StorageError::BackendError("Empty key".to_string()));
        }

        Ok(self.root.join(normalized))
    }
}

#[async_trait]
impl ContentStore for LocalStorage {
    async fn put_text(&self, key: &str, text: &str) -> StorageResult<()> {
        let path = self.full_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::BackendError(e.to_string()))?;
        }
        tokio::fs::write(path, text)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }

    async fn get_text(&self, key: &str) -> StorageResult<String> {
        let path = self.full_path(key)?;
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::BackendError(e.to_string()),
        })?;
        String::from_utf8(bytes).map_err(|_| StorageError::InvalidText(key.to_string()))
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.full_path(key)?;
        tokio::fs::remove_file(path)
            .await
            .map_err(|_| StorageError::NotFound(key.to_string()))
    }
}

/// In-memory text store (for testing)
#[derive(Default)]
pub struct MemoryStorage {
    texts: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryStorage {
    async fn put_text(&self, key: &str, text: &str) -> StorageResult<()> {
        self.texts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), text.to_string());
        Ok(())
    }

    async fn get_text(&self, key: &str) -> StorageResult<String> {
        self.texts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.texts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}
