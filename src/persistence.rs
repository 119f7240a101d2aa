//! Moves the task collection between memory and the key-value store.
//!
//! Loading happens once at startup. Saving goes through a single-slot queue
//! drained by one writer task: a newer snapshot replaces any snapshot that
//! has not been picked up yet, so the store always ends on the last issued
//! collection no matter how quickly mutations arrive.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::{Result, TaskListError};
use crate::store::KeyValueStore;
use crate::task::{decode_tasks, encode_tasks, Task};

/// The one key the whole collection lives under.
pub const TASKS_KEY: &str = "tasks";

pub async fn load_tasks(store: &dyn KeyValueStore) -> Result<Option<Vec<Task>>> {
    let Some(raw) = store.get(TASKS_KEY).await.map_err(TaskListError::Load)? else {
        return Ok(None);
    };
    decode_tasks(&raw).map(Some).map_err(TaskListError::Decode)
}

pub async fn save_tasks(store: &dyn KeyValueStore, tasks: &[Task]) -> Result<()> {
    let raw = encode_tasks(tasks).map_err(TaskListError::Encode)?;
    store.set(TASKS_KEY, raw).await.map_err(TaskListError::Save)
}

/// Loads the stored collection, logging instead of failing.
///
/// `None` means there is nothing to apply: either no value was stored or the
/// read/decode failed.
pub async fn restore(store: &dyn KeyValueStore) -> Option<Vec<Task>> {
    match load_tasks(store).await {
        Ok(Some(tasks)) => {
            info!(count = tasks.len(), "restored tasks");
            Some(tasks)
        }
        Ok(None) => {
            debug!("no stored tasks");
            None
        }
        Err(err) => {
            error!(error = %err, "error loading tasks");
            None
        }
    }
}

/// Runs [`restore`] on the runtime and hands the result back over a channel
/// the UI can poll without blocking.
pub fn spawn_restore(
    handle: &Handle,
    store: Arc<dyn KeyValueStore>,
) -> oneshot::Receiver<Option<Vec<Task>>> {
    let (tx, rx) = oneshot::channel();
    handle.spawn(async move {
        let restored = restore(store.as_ref()).await;
        // receiver gone means the app already quit
        let _ = tx.send(restored);
    });
    rx
}

#[derive(Debug, Clone, Default)]
struct Snapshot {
    version: u64,
    tasks: Vec<Task>,
}

/// Queues collection snapshots for the background writer.
pub struct Persister {
    tx: watch::Sender<Snapshot>,
    writer: JoinHandle<u64>,
    version: u64,
}

impl Persister {
    pub fn spawn(handle: &Handle, store: Arc<dyn KeyValueStore>) -> Self {
        let (tx, rx) = watch::channel(Snapshot::default());
        let writer = handle.spawn(write_loop(store, rx));
        Self {
            tx,
            writer,
            version: 0,
        }
    }

    /// Replaces whatever snapshot is still waiting to be written.
    pub fn save(&mut self, tasks: &[Task]) {
        self.version += 1;
        debug!(version = self.version, count = tasks.len(), "queued save");
        self.tx.send_replace(Snapshot {
            version: self.version,
            tasks: tasks.to_vec(),
        });
    }

    /// Version of the most recently queued snapshot.
    pub fn issued(&self) -> u64 {
        self.version
    }

    /// Closes the queue and waits until the last snapshot has been written.
    /// Returns the version the writer finished on.
    pub async fn flush(self) -> u64 {
        drop(self.tx);
        match self.writer.await {
            Ok(written) => written,
            Err(err) => {
                error!(error = %err, "task writer stopped unexpectedly");
                0
            }
        }
    }
}

async fn write_loop(store: Arc<dyn KeyValueStore>, mut rx: watch::Receiver<Snapshot>) -> u64 {
    let mut written = 0;
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        if snapshot.version <= written {
            continue;
        }
        match save_tasks(store.as_ref(), &snapshot.tasks).await {
            Ok(()) => debug!(version = snapshot.version, "saved tasks"),
            Err(err) => error!(version = snapshot.version, error = %err, "error saving tasks"),
        }
        written = snapshot.version;
    }
    written
}
