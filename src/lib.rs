//! Todo Store - an in-memory todo list store with background file persistence
//!
//! This library provides the task store behind a single-user todo web
//! application: an ordered task collection guarded by a read/write lock,
//! mirrored to a JSON file by fire-and-forget background saves.

/// Configuration management for the store binary
pub mod config;
/// Storage backend implementations
pub mod storage;
/// The task store and its operations
pub mod store;
/// Task record definitions
pub mod task;

pub use config::Config;
pub use storage::{StorageBackend, StoreSnapshot};
pub use store::TodoStore;
pub use task::{Task, DEFAULT_PRIORITY};

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, TodoStoreError>;

/// Error types for the todo store
#[derive(Error, Debug)]
pub enum TodoStoreError {
    /// Reorder input was not a permutation of the current task IDs
    #[error("Invalid reorder: {0}")]
    InvalidReorder(String),

    /// Filesystem error while reading or writing store data
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let err = TodoStoreError::InvalidReorder("expected 2 ids, got 3".to_string());
        assert_eq!(err.to_string(), "Invalid reorder: expected 2 ids, got 3");

        let err = TodoStoreError::ConfigError("bad".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad");
    }
}
