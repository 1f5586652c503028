//! Task store
//!
//! The store owns the task collection and the ID counter behind a single
//! [`RwLock`]. Mutations take the write lock only for the in-memory update;
//! `list` and snapshots take the read lock only long enough to clone.
//!
//! Every successful mutation spawns a detached background save. Each save
//! snapshots the state when it runs, not when it was scheduled, and saves
//! are not ordered against each other: when mutations arrive in quick
//! succession the file can briefly (or until the next mutation) reflect an
//! older snapshot than the newest one, because the last save to *finish*
//! wins. The in-memory state is always authoritative.

use crate::storage::{FileBackend, StorageBackend, StoreSnapshot};
use crate::task::Task;
use crate::TodoStoreError;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Collection plus counter, always locked together
#[derive(Debug)]
struct StoreState {
    tasks: Vec<Task>,
    next_id: u64,
}

impl StoreState {
    fn empty() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let next_id = snapshot.corrected_next_id();
        Self {
            tasks: snapshot.todos,
            next_id,
        }
    }

    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::new(self.tasks.clone(), self.next_id)
    }

    fn find_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }
}

/// In-memory task store mirrored to a storage backend
#[derive(Clone)]
pub struct TodoStore {
    state: Arc<RwLock<StoreState>>,
    backend: Arc<dyn StorageBackend>,
    in_flight: Arc<AtomicUsize>,
}

impl TodoStore {
    /// Open a store persisted to the JSON file at `path`
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_backend(Arc::new(FileBackend::new(path))).await
    }

    /// Open a store on an arbitrary backend, loading whatever it holds.
    ///
    /// Load failures are logged and the store starts empty.
    pub async fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        let state = match backend.load().await {
            Ok(Some(snapshot)) => {
                let state = StoreState::from_snapshot(snapshot);
                info!(
                    "Loaded {} tasks from {} (next id {})",
                    state.tasks.len(),
                    backend.describe(),
                    state.next_id
                );
                state
            }
            Ok(None) => {
                debug!("No saved tasks at {}, starting empty", backend.describe());
                StoreState::empty()
            }
            Err(e) => {
                warn!(
                    "Failed to load tasks from {}: {}; starting empty",
                    backend.describe(),
                    e
                );
                StoreState::empty()
            }
        };

        Self {
            state: Arc::new(RwLock::new(state)),
            backend,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Append a new task at the end of the list
    pub async fn add(
        &self,
        text: &str,
        priority: &str,
        category: &str,
        due_date: Option<NaiveDate>,
    ) -> Task {
        let task = {
            let mut state = self.state.write().await;
            let id = state.next_id;
            state.next_id += 1;
            let task = Task::new(id, text, priority, category, due_date, state.tasks.len());
            state.tasks.push(task.clone());
            task
        };

        debug!("Task {} added at position {}", task.id, task.sort_order);
        self.schedule_save();
        task
    }

    /// Snapshot of all tasks in display order
    pub async fn list(&self) -> Vec<Task> {
        let mut tasks = {
            let state = self.state.read().await;
            state.tasks.clone()
        };
        tasks.sort_by_key(|task| task.sort_order);
        tasks
    }

    /// Look up a single task
    pub async fn get(&self, id: u64) -> Option<Task> {
        let state = self.state.read().await;
        state.tasks.iter().find(|task| task.id == id).cloned()
    }

    /// Flip the completion flag; false if no such task
    pub async fn toggle(&self, id: u64) -> bool {
        let completed = {
            let mut state = self.state.write().await;
            match state.find_mut(id) {
                Some(task) => {
                    task.toggle();
                    task.completed
                }
                None => return false,
            }
        };

        debug!("Task {} toggled (completed: {})", id, completed);
        self.schedule_save();
        true
    }

    /// Replace a task's editable fields; false if no such task
    pub async fn update(
        &self,
        id: u64,
        text: &str,
        priority: &str,
        category: &str,
        due_date: Option<NaiveDate>,
    ) -> bool {
        {
            let mut state = self.state.write().await;
            match state.find_mut(id) {
                Some(task) => task.apply_edit(text, priority, category, due_date),
                None => return false,
            }
        }

        debug!("Task {} updated", id);
        self.schedule_save();
        true
    }

    /// Remove a task; the others keep their sort order values
    pub async fn delete(&self, id: u64) -> bool {
        {
            let mut state = self.state.write().await;
            match state.tasks.iter().position(|task| task.id == id) {
                Some(index) => {
                    state.tasks.remove(index);
                }
                None => return false,
            }
        }

        debug!("Task {} deleted", id);
        self.schedule_save();
        true
    }

    /// Assign `sort_order = i` to the task whose ID is `ordered_ids[i]`.
    ///
    /// The input must be a permutation of the current IDs: a wrong length,
    /// an unknown ID or a repeated ID rejects the whole call with no change.
    pub async fn reorder(&self, ordered_ids: &[u64]) -> bool {
        {
            let mut state = self.state.write().await;
            if let Err(e) = validate_permutation(&state.tasks, ordered_ids) {
                debug!("Reorder rejected: {}", e);
                return false;
            }

            let positions: HashMap<u64, usize> = ordered_ids
                .iter()
                .enumerate()
                .map(|(position, id)| (*id, position))
                .collect();
            for task in state.tasks.iter_mut() {
                if let Some(position) = positions.get(&task.id) {
                    task.sort_order = *position;
                }
            }
        }

        debug!("Reordered {} tasks", ordered_ids.len());
        self.schedule_save();
        true
    }

    /// Number of tasks held
    pub async fn len(&self) -> usize {
        self.state.read().await.tasks.len()
    }

    /// Whether the store holds no tasks
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Next ID the store will hand out
    pub async fn next_id(&self) -> u64 {
        self.state.read().await.next_id
    }

    /// Copy of the full state in collection order, as the background save writes it
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.snapshot()
    }

    /// Save to the store's backend now and report the outcome
    pub async fn save_now(&self) -> crate::Result<()> {
        let snapshot = self.snapshot().await;
        self.backend.save(&snapshot).await
    }

    /// Background saves that have been scheduled but not finished
    pub fn in_flight_saves(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Export document: tasks in display order plus the ID counter
    pub async fn export_snapshot(&self) -> StoreSnapshot {
        let mut snapshot = self.snapshot().await;
        snapshot.todos.sort_by_key(|task| task.sort_order);
        snapshot
    }

    /// Export as pretty-printed JSON bytes
    pub async fn export_bytes(&self) -> crate::Result<Vec<u8>> {
        self.export_snapshot().await.to_json_bytes()
    }

    /// Export to an arbitrary file, replacing it if present
    pub async fn export_to_path(&self, path: &Path) -> crate::Result<()> {
        let bytes = self.export_bytes().await?;
        crate::storage::file::write_atomic(path, &bytes).await?;
        info!("Exported tasks to {}", path.display());
        Ok(())
    }

    /// Export to any async writer (a response body, a socket, a buffer)
    pub async fn export_to_writer<W>(&self, mut writer: W) -> crate::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let bytes = self.export_bytes().await?;
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Spawn a detached save of the current state; errors are only logged
    fn schedule_save(&self) {
        let state = Arc::clone(&self.state);
        let backend = Arc::clone(&self.backend);
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            let _guard = InFlightGuard(in_flight);
            let snapshot = state.read().await.snapshot();
            if let Err(e) = backend.save(&snapshot).await {
                error!("Failed to save tasks to {}: {}", backend.describe(), e);
            }
        });
    }
}

/// Decrements the in-flight save count when a save task ends, even by panic
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Suggested download name for an export taken at `now`
pub fn export_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("todos_export_{}.json", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Export name for the current local time
pub fn export_file_name_now() -> String {
    export_file_name(&Local::now())
}

fn validate_permutation(tasks: &[Task], ordered_ids: &[u64]) -> crate::Result<()> {
    if ordered_ids.len() != tasks.len() {
        return Err(TodoStoreError::InvalidReorder(format!(
            "expected {} ids, got {}",
            tasks.len(),
            ordered_ids.len()
        )));
    }

    let known: HashSet<u64> = tasks.iter().map(|task| task.id).collect();
    let mut seen = HashSet::with_capacity(ordered_ids.len());
    for id in ordered_ids {
        if !known.contains(id) {
            return Err(TodoStoreError::InvalidReorder(format!(
                "unknown task id {}",
                id
            )));
        }
        if !seen.insert(*id) {
            return Err(TodoStoreError::InvalidReorder(format!(
                "duplicate task id {}",
                id
            )));
        }
    }
    Ok(())
}
