//! Persistence for the interest counter.
//!
//! The counter is a single non-negative integer stored as `{"count": N}` at a
//! fixed location. Reads never fail: a missing, unreadable or corrupt record
//! counts as zero. Increments read, add one and persist; a failed persist is
//! reported to the caller and the stored value stays as it was.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum CounterError {
    #[error("failed to persist counter: {0}")]
    Storage(#[from] io::Error),

    #[error("failed to encode counter record: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CounterRecord {
    #[serde(default)]
    pub count: u64,
}

/// Where the counter record lives.
///
/// `load` returns `Ok(None)` when no record has been written yet.
pub trait Storage: Send + Sync + 'static {
    fn load(&self) -> impl Future<Output = io::Result<Option<String>>> + Send;
    fn persist(&self, contents: &str) -> impl Future<Output = io::Result<()>> + Send;
}

/// A record on the local filesystem.
///
/// Writes go to a sibling temporary file that is renamed over the target, so
/// readers only ever see a complete record.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    writes: AtomicU64,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writes: AtomicU64::new(0),
        }
    }

    fn scratch_path(&self) -> PathBuf {
        let seq = self.writes.fetch_add(1, Ordering::Relaxed);
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "counter".into());
        name.push(format!(".{}.{}.tmp", std::process::id(), seq));
        self.path.with_file_name(name)
    }
}

impl Storage for FileStorage {
    async fn load(&self) -> io::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn persist(&self, contents: &str) -> io::Result<()> {
        let scratch = self.scratch_path();
        if let Err(e) = tokio::fs::write(&scratch, contents).await {
            let _ = tokio::fs::remove_file(&scratch).await;
            return Err(e);
        }
        if let Err(e) = tokio::fs::rename(&scratch, &self.path).await {
            let _ = tokio::fs::remove_file(&scratch).await;
            return Err(e);
        }
        Ok(())
    }
}

/// How concurrent increments are arbitrated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IncrementMode {
    /// Increments run one at a time; none are lost.
    #[default]
    Serialized,
    /// Overlapping increments may read the same base value and lose updates.
    Unguarded,
}

impl FromStr for IncrementMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serialized" => Ok(Self::Serialized),
            "unguarded" => Ok(Self::Unguarded),
            other => Err(format!(
                "unknown increment mode `{other}`, expected `serialized` or `unguarded`"
            )),
        }
    }
}

pub struct CounterStore<S: Storage = FileStorage> {
    storage: S,
    mode: IncrementMode,
    guard: Mutex<()>,
}

impl CounterStore<FileStorage> {
    pub fn open(path: impl Into<PathBuf>, mode: IncrementMode) -> Self {
        Self::new(FileStorage::new(path), mode)
    }
}

impl<S: Storage> CounterStore<S> {
    pub fn new(storage: S, mode: IncrementMode) -> Self {
        Self {
            storage,
            mode,
            guard: Mutex::new(()),
        }
    }

    /// Current count, or 0 when nothing usable has been persisted.
    pub async fn read(&self) -> u64 {
        let contents = match self.storage.load().await {
            Ok(Some(contents)) => contents,
            Ok(None) => return 0,
            Err(e) => {
                warn!("Failed to load counter, treating as 0: {e}");
                return 0;
            }
        };
        match serde_json::from_str::<CounterRecord>(&contents) {
            Ok(record) => record.count,
            Err(e) => {
                warn!("Corrupt counter record, treating as 0: {e}");
                0
            }
        }
    }

    pub async fn increment_and_read(&self) -> Result<u64, CounterError> {
        match self.mode {
            IncrementMode::Serialized => {
                let _held = self.guard.lock().await;
                self.increment().await
            }
            IncrementMode::Unguarded => self.increment().await,
        }
    }

    async fn increment(&self) -> Result<u64, CounterError> {
        let count = self.read().await.saturating_add(1);
        let contents = serde_json::to_string(&CounterRecord { count })?;
        self.storage.persist(&contents).await?;
        debug!("Counter incremented to {count}");
        Ok(count)
    }
}
