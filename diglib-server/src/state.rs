//! Application state

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use diglib_core::storage::{ContentStore, LocalStorage};
use diglib_core::{Book, BookId, NewBook};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Genres served when no genres file is configured
const DEFAULT_GENRES: &str = include_str!("../genres.json");

/// Directory inside the content store holding book texts
pub const CONTENT_DIR: &str = "bookcontents";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage for book texts
    pub storage: Arc<dyn ContentStore>,

    /// Book metadata, keyed by numeric id
    pub catalog: Arc<RwLock<Catalog>>,

    pub genres: Arc<Vec<String>>,

    pub config: Arc<ServerConfig>,
}

/// Catalog of book metadata
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub books: BTreeMap<u64, Book>,
}

impl Catalog {
    /// Load the catalog from a JSON file
    pub async fn load(path: &Path) -> Result<Self> {
        // Missing file means an empty catalog
        match tokio::fs::read_to_string(path).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Save the catalog to a JSON file atomically
    pub async fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;

        // Temp file in the same directory so the rename stays on one filesystem
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &data).await?;
        tokio::fs::rename(&temp_path, path).await?;
        Ok(())
    }

    /// Next id to hand out; ids start at 1 and are never reused while higher ones exist
    pub fn next_id(&self) -> u64 {
        self.books.keys().next_back().map_or(1, |id| id + 1)
    }

    /// Add a validated book whose text is stored under `file_name`
    pub fn insert(&mut self, book: NewBook, file_name: String) -> Book {
        let id = self.next_id();
        let book = book.into_book(BookId::Numeric(id), Some(file_name));
        self.books.insert(id, book.clone());
        book
    }

    pub fn get(&self, id: u64) -> Option<&Book> {
        self.books.get(&id)
    }
}

impl AppState {
    /// Create state backed by local storage under the configured path
    pub async fn new(config: ServerConfig) -> Result<Self> {
        tokio::fs::create_dir_all(config.storage_path.join(CONTENT_DIR))
            .await
            .with_context(|| format!("Failed to create {:?}", config.storage_path))?;

        let catalog_path = config.storage_path.join("catalog.json");
        let catalog = Catalog::load(&catalog_path)
            .await
            .with_context(|| format!("Failed to load catalog {:?}", catalog_path))?;

        let genres = match &config.genres_file {
            Some(path) => load_genres(path).await?,
            None => serde_json::from_str(DEFAULT_GENRES)?,
        };

        let storage = Arc::new(LocalStorage::new(&config.storage_path));

        Ok(Self::from_parts(storage, catalog, genres, config))
    }

    pub fn from_parts(
        storage: Arc<dyn ContentStore>,
        catalog: Catalog,
        genres: Vec<String>,
        config: ServerConfig,
    ) -> Self {
        Self {
            storage,
            catalog: Arc::new(RwLock::new(catalog)),
            genres: Arc::new(genres),
            config: Arc::new(config),
        }
    }

    /// Path of the catalog index file
    pub fn catalog_path(&self) -> PathBuf {
        self.config.storage_path.join("catalog.json")
    }

    /// Save the catalog index
    pub async fn save_catalog(&self) -> Result<()> {
        let catalog = self.catalog.read().await;
        catalog.save(&self.catalog_path()).await
    }

    /// Fresh storage key for a book's text
    pub fn new_content_key() -> String {
        format!("{}/{}.txt", CONTENT_DIR, Uuid::new_v4())
    }
}

async fn load_genres(path: &Path) -> Result<Vec<String>> {
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read genres file {:?}", path))?;
    serde_json::from_str(&data).with_context(|| format!("Invalid genres file {:?}", path))
}
