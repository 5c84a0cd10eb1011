//! Client configuration

use crate::error::{ClientError, Result};
use reqwest::Url;
use std::time::Duration;

/// API used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://api.diglib.no";

/// Request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`crate::RemoteClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Timeout applied to each request
    pub timeout: Duration,

    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("diglib/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Read `DIGLIB_API_URL` and `DIGLIB_HTTP_TIMEOUT_SECS`, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("DIGLIB_API_URL") {
            Ok(url) => Self::new(url),
            Err(_) => Self::default(),
        };

        if let Ok(secs) = std::env::var("DIGLIB_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                ClientError::Config(format!("DIGLIB_HTTP_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Parse the base URL, rejecting anything that cannot carry endpoint paths
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL {}: {}", self.base_url, e)))?;

        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base URL must be http or https: {}",
                self.base_url
            )));
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("diglib/"));
    }

    #[test]
    fn test_base_url_validation() {
        assert!(ClientConfig::new("http://localhost:8080/api")
            .parsed_base_url()
            .is_ok());
        assert!(matches!(
            ClientConfig::new("not a url").parsed_base_url(),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::new("mailto:books@example.com").parsed_base_url(),
            Err(ClientError::Config(_))
        ));
    }
}
