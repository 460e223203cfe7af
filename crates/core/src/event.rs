//! Domain event system: decoupled notifications for presentation.
//!
//! The agent loop publishes an event for every appended message and every
//! tool dispatch. Subscribers (the console presenter, tests) observe them
//! without being able to influence the loop: publishing never fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::message::Message;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The gateway produced a final textual answer
    Done,
    /// The turn budget ran out before a final answer
    Exhausted,
}

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A run began
    RunStarted {
        run_id: String,
        turn_budget: u32,
        timestamp: DateTime<Utc>,
    },

    /// A message was appended to the run's history
    MessageAppended {
        run_id: String,
        message: Message,
        timestamp: DateTime<Utc>,
    },

    /// A tool call is about to be dispatched
    ToolStarted {
        run_id: String,
        tool_name: String,
        timestamp: DateTime<Utc>,
    },

    /// A tool call finished (successfully or with a textual error)
    ToolFinished {
        run_id: String,
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The run reached a terminal state
    RunFinished {
        run_id: String,
        status: RunStatus,
        turns_used: u32,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // Ignore send errors (no subscribers = that's fine)
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::ToolFinished {
            run_id: "run-1".into(),
            tool_name: "search_flights".into(),
            success: true,
            duration_ms: 42,
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DomainEvent::ToolFinished {
                tool_name, success, ..
            } => {
                assert_eq!(tool_name, "search_flights");
                assert!(success);
            }
            _ => panic!("Expected ToolFinished event"),
        }
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(DomainEvent::RunFinished {
            run_id: "run-1".into(),
            status: RunStatus::Exhausted,
            turns_used: 20,
            timestamp: Utc::now(),
        });
    }
}
