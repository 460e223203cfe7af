//! In-memory store: the default for one-shot CLI runs and for tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use wayfarer_core::error::MemoryError;
use wayfarer_core::memory::MessageStore;
use wayfarer_core::message::Message;

/// A store that keeps the history in a Vec behind an async RwLock.
///
/// Cloning shares the underlying history.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn reset(&self) -> Result<(), MemoryError> {
        self.messages.write().await.clear();
        Ok(())
    }

    async fn append(&self, messages: Vec<Message>) -> Result<(), MemoryError> {
        // One write guard per batch: readers see all of it or none of it.
        self.messages.write().await.extend(messages);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Message>, MemoryError> {
        Ok(self.messages.read().await.clone())
    }

    async fn len(&self) -> Result<usize, MemoryError> {
        Ok(self.messages.read().await.len())
    }
}
