//! Message domain types.
//!
//! These are the value objects that make up a run's history:
//! the user states a task, the assistant either answers or asks for a tool,
//! and every tool request is followed by exactly one tool message.
//!
//! Each role carries only the fields that are valid for it, so the history
//! never needs runtime field-presence checks.

use serde::{Deserialize, Serialize};

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The LLM
    Assistant,
    /// Tool execution result
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A single message in a run's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// The task description supplied by the user.
    User { content: String },

    /// A response produced by the LLM gateway.
    Assistant(AssistantMessage),

    /// The textual result of a dispatched tool call.
    Tool {
        /// The id of the assistant tool call this answers
        tool_call_id: String,
        content: String,
    },
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    /// Create a tool result message.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Message::User { .. } => Role::User,
            Message::Assistant(_) => Role::Assistant,
            Message::Tool { .. } => Role::Tool,
        }
    }

    /// The assistant payload, if this is an assistant message.
    pub fn as_assistant(&self) -> Option<&AssistantMessage> {
        match self {
            Message::Assistant(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<AssistantMessage> for Message {
    fn from(msg: AssistantMessage) -> Self {
        Message::Assistant(msg)
    }
}

/// A tool call requested by the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Unique ID for this tool call (echoed back in the tool message)
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as the raw JSON string produced by the LLM
    pub arguments: String,
}

impl ToolCallRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// An assistant response: either a final answer or a batch of tool requests.
///
/// Only one of the two fields is meaningful. Construct through
/// [`AssistantMessage::answer`] or [`AssistantMessage::tool_calls`] and
/// inspect through [`AssistantMessage::next_action`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ToolCallRequest>,
}

/// What the loop should do after an assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction<'a> {
    /// Terminal: the text is the final answer.
    Answer(&'a str),
    /// Non-terminal: dispatch this call.
    CallTool(&'a ToolCallRequest),
}

impl AssistantMessage {
    /// A terminal message carrying the final answer.
    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A non-terminal message carrying tool requests. Any accompanying text is dropped.
    pub fn tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self {
            content: None,
            tool_calls: calls,
        }
    }

    /// Shorthand for a message with a single tool request.
    pub fn tool_call(call: ToolCallRequest) -> Self {
        Self::tool_calls(vec![call])
    }

    /// Decide the next step. Only the first tool request is ever acted on.
    pub fn next_action(&self) -> NextAction<'_> {
        match self.tool_calls.first() {
            Some(call) => NextAction::CallTool(call),
            None => NextAction::Answer(self.content.as_deref().unwrap_or("")),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.tool_calls.is_empty()
    }

    /// Text content, if any.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// All tool requests, including the ones the loop ignores.
    pub fn requested_calls(&self) -> &[ToolCallRequest] {
        &self.tool_calls
    }
}
