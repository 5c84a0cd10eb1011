//! CLI command implementations

mod catalog;
mod export;
mod info;
mod read;
mod upload;

pub use catalog::{delete, genres, list};
pub use export::export;
pub use info::info;
pub use read::read;
pub use upload::upload;

use anyhow::{Context, Result};
use diglib_client::{ClientConfig, RemoteClient};

/// Build a client for `api_url`, or for the environment's API when none is given
pub fn connect(api_url: Option<&str>) -> Result<RemoteClient> {
    let mut config = ClientConfig::from_env().context("Invalid client configuration")?;
    if let Some(url) = api_url {
        config.base_url = url.to_string();
    }
    tracing::debug!("Using API at {}", config.base_url);

    RemoteClient::new(&config).with_context(|| format!("Cannot use API at {}", config.base_url))
}
