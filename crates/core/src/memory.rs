//! MessageStore trait: the ordered history of a single run.
//!
//! The store is the single source of truth the gateway reads every turn.
//! It is append-only: messages are never edited or removed individually,
//! only cleared wholesale when a new run begins.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MemoryError;
use crate::message::Message;

/// Unique identifier for a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The core MessageStore trait.
///
/// Implementations must make `append` atomic with respect to `read_all`:
/// a reader sees either none or all of a batch.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Human-readable backend name (e.g., "in_memory", "file").
    fn name(&self) -> &str;

    /// Clear all history. A no-op on an empty store.
    async fn reset(&self) -> Result<(), MemoryError>;

    /// Append messages to the tail, preserving their order.
    async fn append(&self, messages: Vec<Message>) -> Result<(), MemoryError>;

    /// The full history in append order.
    async fn read_all(&self) -> Result<Vec<Message>, MemoryError>;

    /// Number of stored messages.
    async fn len(&self) -> Result<usize, MemoryError> {
        Ok(self.read_all().await?.len())
    }

    async fn is_empty(&self) -> Result<bool, MemoryError> {
        Ok(self.len().await? == 0)
    }
}
