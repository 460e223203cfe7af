//! # Wayfarer Core
//!
//! Domain types, traits, and error definitions for the Wayfarer planning agent.
//! This crate has **no framework dependencies**: it defines the domain model
//! that the provider, memory, tool and agent crates implement against.
//!
//! ## Seams
//!
//! - [`Provider`]: the LLM gateway, one assistant message per request
//! - [`Tool`] / [`ToolRegistry`]: named capabilities with JSON Schema arguments
//! - [`MessageStore`]: the ordered, append-only history of one run
//! - [`EventBus`]: fire-and-forget notifications for presentation

pub mod error;
pub mod event;
pub mod memory;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use event::{DomainEvent, EventBus, RunStatus};
pub use memory::{MessageStore, RunId};
pub use message::{AssistantMessage, Message, NextAction, Role, ToolCallRequest};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use tool::{Tool, ToolInput, ToolRegistry, ToolSpec};
