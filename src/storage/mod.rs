/// In-memory backend
pub mod backend;
/// JSON file backend
pub mod file;

use crate::task::Task;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use backend::MemoryBackend;
pub use file::FileBackend;

/// Persisted form of the store: every task plus the ID counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// All tasks held by the store
    #[serde(default)]
    pub todos: Vec<Task>,

    /// Next ID the store will hand out
    #[serde(default)]
    pub next_id: u64,
}

impl StoreSnapshot {
    /// Create a snapshot from tasks and a counter
    pub fn new(todos: Vec<Task>, next_id: u64) -> Self {
        Self { todos, next_id }
    }

    /// Pretty-printed JSON document
    pub fn to_json_bytes(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Parse a JSON document
    pub fn from_json_bytes(bytes: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Counter corrected so it exceeds every ID in the snapshot and is at least 1
    pub fn corrected_next_id(&self) -> u64 {
        let max_id = self.todos.iter().map(|task| task.id).max().unwrap_or(0);
        self.next_id.max(1).max(max_id + 1)
    }
}

/// Trait for storage backend implementations
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Load the persisted snapshot; `Ok(None)` when nothing has been saved yet
    async fn load(&self) -> crate::Result<Option<StoreSnapshot>>;

    /// Replace the persisted snapshot as a whole
    async fn save(&self, snapshot: &StoreSnapshot) -> crate::Result<()>;

    /// Human-readable description of where data goes, for log lines
    fn describe(&self) -> String;
}
