//! JSON file backend

use crate::storage::{StorageBackend, StoreSnapshot};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

/// Stores the snapshot as a pretty-printed JSON document at a fixed path
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend targeting `path`; the file need not exist yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn load(&self) -> crate::Result<Option<StoreSnapshot>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        StoreSnapshot::from_json_bytes(&bytes).map(Some)
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> crate::Result<()> {
        let bytes = snapshot.to_json_bytes()?;
        write_atomic(&self.path, &bytes).await?;
        debug!(
            "Saved {} tasks to {}",
            snapshot.todos.len(),
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write `bytes` to `path` by way of a sibling temp file and a rename, so
/// readers see either the old document or the new one, never a torn write.
///
/// Each call uses its own temp file; concurrent saves race only on the rename.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> crate::Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "todos.json".to_string());
    let temp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

    let result = async {
        let mut file = File::create(&temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&temp_path, path).await
    }
    .await;

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    Ok(())
}
