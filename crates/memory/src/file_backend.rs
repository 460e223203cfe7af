//! File-based store: an append-only JSON-lines log per run.
//!
//! Each line is a JSON-encoded [`LogEntry`] wrapping one message. Runs are
//! kept apart by file name: `<dir>/<run_id>.jsonl`.
//!
//! The log is loaded into memory on creation; appends write only the new
//! lines, so earlier lines are never rewritten.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use wayfarer_core::error::MemoryError;
use wayfarer_core::memory::{MessageStore, RunId};
use wayfarer_core::message::Message;

/// One line of a run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub appended_at: DateTime<Utc>,
    pub message: Message,
}

/// A file-backed message store for a single run.
pub struct FileStore {
    path: PathBuf,
    messages: Arc<RwLock<Vec<Message>>>,
}

impl FileStore {
    /// Open (or prepare) the log for `run_id` inside `dir`.
    pub fn open(dir: &Path, run_id: &RunId) -> Self {
        Self::at_path(dir.join(format!("{run_id}.jsonl")))
    }

    /// Open the log at an explicit path.
    ///
    /// If the file exists, its messages are loaded. Otherwise the store
    /// starts empty and the file is created on first append.
    pub fn at_path(path: PathBuf) -> Self {
        let messages = Self::load_from_disk(&path);
        debug!(path = %path.display(), count = messages.len(), "Run log loaded");
        Self {
            path,
            messages: Arc::new(RwLock::new(messages)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> Vec<Message> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<LogEntry>(line) {
                Ok(entry) => Some(entry.message),
                Err(e) => {
                    warn!(error = %e, "Skipping corrupted run log entry");
                    None
                }
            })
            .collect()
    }

    fn ensure_parent(&self) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MemoryError::Storage(format!("Failed to create run log directory: {e}"))
            })?;
        }
        Ok(())
    }

    fn encode(messages: &[Message]) -> Result<String, MemoryError> {
        let now = Utc::now();
        let mut content = String::new();
        for message in messages {
            let line = serde_json::to_string(&LogEntry {
                appended_at: now,
                message: message.clone(),
            })
            .map_err(|e| MemoryError::Storage(format!("Failed to serialize message: {e}")))?;
            content.push_str(&line);
            content.push('\n');
        }
        Ok(content)
    }
}

#[async_trait]
impl MessageStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn reset(&self) -> Result<(), MemoryError> {
        let mut messages = self.messages.write().await;
        messages.clear();
        if self.path.exists() {
            std::fs::write(&self.path, "").map_err(|e| {
                MemoryError::Storage(format!("Failed to truncate run log: {e}"))
            })?;
        }
        Ok(())
    }

    async fn append(&self, batch: Vec<Message>) -> Result<(), MemoryError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut messages = self.messages.write().await;
        self.ensure_parent()?;

        let content = Self::encode(&batch)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| MemoryError::Storage(format!("Failed to open run log: {e}")))?;
        file.write_all(content.as_bytes())
            .map_err(|e| MemoryError::Storage(format!("Failed to write run log: {e}")))?;

        messages.extend(batch);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Message>, MemoryError> {
        Ok(self.messages.read().await.clone())
    }

    async fn len(&self) -> Result<usize, MemoryError> {
        Ok(self.messages.read().await.len())
    }
}
