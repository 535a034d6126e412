//! Store Module - Content store access
//!
//! Artifacts are read from and predictions written to a namespaced object
//! store. Backends:
//! - `local` - directory tree `<root>/<namespace>/<key>`
//! - `http` - plain GET/PUT against `<base>/<namespace>/<key>`
//! - `memory` - in-process map, used by tests and dry runs

pub mod http;
pub mod local;
pub mod memory;
pub mod retry;

pub use http::HttpStore;
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use retry::{with_retry, RetryPolicy};

use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),

    /// Transient failure; the only kind worth retrying
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP {status} for '{key}'")]
    Http { status: u16, key: String },

    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Namespaced blob store
pub trait ObjectStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;
    fn put(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StoreError>;
    fn exists(&self, key: &str) -> Result<bool, StoreError>;
    /// Human readable location, for logs
    fn describe(&self) -> String;
}

/// Reject keys that could escape the namespace
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() || key.starts_with('/') || key.ends_with('/') {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    if key.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
