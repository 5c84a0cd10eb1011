//! DigLib REST client
//!
//! Thin `reqwest` wrapper over the catalog endpoints plus the remote
//! [`diglib_core::PageFetcher`] used to read and export books.

pub mod config;
pub mod error;
pub mod remote;

pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::{ClientError, Result};
pub use remote::RemoteClient;
