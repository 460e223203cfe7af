//! Shared test doubles for dispatcher and loop tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wayfarer_core::error::{ProviderError, ToolError};
use wayfarer_core::message::{AssistantMessage, ToolCallRequest};
use wayfarer_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use wayfarer_core::tool::{Tool, ToolInput};

/// A mock provider that returns a sequence of scripted responses.
///
/// Panics if more calls are made than responses provided.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    call_count: Mutex<usize>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    pub fn single_text(text: &str) -> Self {
        Self::new(vec![make_text_response(text)])
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let responses = self.responses.lock().unwrap();

        if *count >= responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                *count,
                responses.len()
            );
        }

        let response = responses[*count].clone();
        *count += 1;
        Ok(response)
    }
}

/// A provider that requests the same tool on every call and never answers.
pub struct AlwaysToolProvider {
    tool: String,
    arguments: String,
    calls: AtomicUsize,
    history_lengths: Mutex<Vec<usize>>,
    last_system_prompt: Mutex<Option<String>>,
}

impl AlwaysToolProvider {
    pub fn new(tool: &str, arguments: &str) -> Self {
        Self {
            tool: tool.to_string(),
            arguments: arguments.to_string(),
            calls: AtomicUsize::new(0),
            history_lengths: Mutex::new(Vec::new()),
            last_system_prompt: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// History length seen by each call, in order.
    pub fn history_lengths(&self) -> Vec<usize> {
        self.history_lengths.lock().unwrap().clone()
    }

    pub fn last_system_prompt(&self) -> Option<String> {
        self.last_system_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for AlwaysToolProvider {
    fn name(&self) -> &str {
        "always_tool"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.history_lengths
            .lock()
            .unwrap()
            .push(request.messages.len());
        *self.last_system_prompt.lock().unwrap() = request.system_prompt;

        Ok(make_tool_call_response(vec![make_tool_call(
            &format!("call_{n}"),
            &self.tool,
            &self.arguments,
        )]))
    }
}

/// A provider whose every call fails at the transport level.
pub struct FailingProvider;

#[async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::Network("connection refused".into()))
    }
}

pub fn make_text_response(text: &str) -> ProviderResponse {
    response(AssistantMessage::answer(text))
}

pub fn make_tool_call_response(calls: Vec<ToolCallRequest>) -> ProviderResponse {
    response(AssistantMessage::tool_calls(calls))
}

pub fn make_tool_call(id: &str, name: &str, arguments: &str) -> ToolCallRequest {
    ToolCallRequest::new(id, name, arguments)
}

fn response(message: AssistantMessage) -> ProviderResponse {
    ProviderResponse {
        message,
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Records its invocations. Requires a string `city`.
pub struct RecordingTool {
    pub calls: Arc<AtomicUsize>,
    pub last_context: Arc<Mutex<Option<String>>>,
}

impl RecordingTool {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            last_context: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        "record"
    }

    fn description(&self) -> &str {
        "Records the city it was called with"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": { "type": "string" }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, input: ToolInput) -> Result<String, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_context.lock().unwrap() = Some(input.context.clone());
        let city = input.args["city"].as_str().unwrap_or_default();
        Ok(format!("recorded {city}"))
    }
}

/// Always fails.
pub struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "explode"
    }

    fn description(&self) -> &str {
        "Fails every time"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _input: ToolInput) -> Result<String, ToolError> {
        Err(ToolError::ExecutionFailed("provider returned 502".into()))
    }
}
