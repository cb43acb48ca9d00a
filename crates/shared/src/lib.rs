//! Shared library for the anime list fetcher.
//!
//! This crate provides common functionality used by the fetcher library
//! and its binary:
//! - Configuration management
//! - Logging infrastructure
//! - Service and score models
//! - Shared error types

pub mod config;
pub mod error;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{FetchError, Result};
pub use logging::LogConfig;
pub use models::*;
