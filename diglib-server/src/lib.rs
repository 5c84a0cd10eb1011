//! DigLib Server Library
//!
//! Reference implementation of the DigLib REST API, exported for testing
//! and reuse.

pub mod config;
pub mod handlers;
pub mod routes;
pub mod state;
