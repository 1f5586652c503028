//! Backend

use crate::storage::{StorageBackend, StoreSnapshot};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage backend implementation
#[derive(Clone)]
pub struct MemoryBackend {
    storage: Arc<RwLock<Option<StoreSnapshot>>>,
}

impl MemoryBackend {
    /// Create an empty in-memory storage backend
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a backend that already holds a snapshot
    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            storage: Arc::new(RwLock::new(Some(snapshot))),
        }
    }

    /// Last snapshot written, if any
    pub async fn current(&self) -> Option<StoreSnapshot> {
        self.storage.read().await.clone()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn load(&self) -> crate::Result<Option<StoreSnapshot>> {
        let storage = self.storage.read().await;
        Ok(storage.clone())
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> crate::Result<()> {
        let mut storage = self.storage.write().await;
        *storage = Some(snapshot.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
