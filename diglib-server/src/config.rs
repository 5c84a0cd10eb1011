//! Server configuration from `DIGLIB_*` environment variables

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::path::PathBuf;

/// Runtime settings for the server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Root directory for the catalog and book contents
    pub storage_path: PathBuf,

    pub bind_addr: SocketAddr,

    /// Page size used when a content request does not name one
    pub page_size: NonZeroU32,

    /// `*` or a comma-separated list of origins; `None` allows local development origins
    pub cors_origins: Option<String>,

    /// JSON array of genres replacing the built-in list
    pub genres_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./diglib_data"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            page_size: diglib_core::READ_PAGE_SIZE,
            cors_origins: None,
            genres_file: None,
        }
    }
}

impl ServerConfig {
    /// Build a config from the environment, using defaults for unset variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("DIGLIB_STORAGE_PATH") {
            config.storage_path = PathBuf::from(path);
        }
        if let Ok(addr) = std::env::var("DIGLIB_BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("Invalid DIGLIB_BIND_ADDR: {}", addr))?;
        }
        if let Ok(size) = std::env::var("DIGLIB_PAGE_SIZE") {
            config.page_size = size
                .parse()
                .with_context(|| format!("Invalid DIGLIB_PAGE_SIZE: {}", size))?;
        }
        config.cors_origins = std::env::var("DIGLIB_CORS_ORIGINS").ok();
        config.genres_file = std::env::var("DIGLIB_GENRES_FILE").ok().map(PathBuf::from);

        Ok(config)
    }

    /// Config rooted at `storage_path` with every other setting at its default
    pub fn with_storage_path(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
            ..Self::default()
        }
    }
}
