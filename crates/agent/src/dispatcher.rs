//! Tool dispatch: turn one requested call into one textual result.
//!
//! Dispatch never fails. Unknown tools, malformed arguments, schema
//! violations and tool errors all come back as text the model can read
//! and plan around.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use wayfarer_core::error::ToolError;
use wayfarer_core::message::ToolCallRequest;
use wayfarer_core::tool::{ToolInput, ToolRegistry};

/// The result of dispatching a single tool call.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// Text to append as the tool message
    pub content: String,

    /// Whether the content is an error report rather than tool output
    pub failed: bool,

    pub duration: Duration,
}

/// Resolves tool calls against a frozen registry and runs them.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatch `call`, passing the user's task along as `context`.
    pub async fn dispatch(&self, call: &ToolCallRequest, context: &str) -> DispatchOutcome {
        let start = Instant::now();

        let Some(tool) = self.registry.get(&call.name) else {
            warn!(tool = %call.name, call_id = %call.id, "Unknown tool requested");
            return DispatchOutcome {
                content: format!("Error: Unknown tool \"{}\"", call.name),
                failed: true,
                duration: start.elapsed(),
            };
        };

        debug!(tool = %call.name, call_id = %call.id, args = %call.arguments, "Dispatching tool");

        let result = match self.parse_arguments(call) {
            Ok(args) => {
                tool.execute(ToolInput {
                    context: context.to_string(),
                    args,
                })
                .await
            }
            Err(e) => Err(e),
        };

        let duration = start.elapsed();
        match result {
            Ok(content) => {
                debug!(tool = %call.name, ?duration, bytes = content.len(), "Tool finished");
                DispatchOutcome {
                    content,
                    failed: false,
                    duration,
                }
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                DispatchOutcome {
                    content: format!("Error running tool \"{}\": {e}", call.name),
                    failed: true,
                    duration,
                }
            }
        }
    }

    /// Parse the raw argument string and check it against the advertised schema.
    fn parse_arguments(&self, call: &ToolCallRequest) -> Result<serde_json::Value, ToolError> {
        let raw = call.arguments.trim();
        let args = if raw.is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(raw)
                .map_err(|e| ToolError::InvalidArguments(format!("malformed JSON: {e}")))?
        };
        self.registry.validate_arguments(&call.name, &args)?;
        Ok(args)
    }
}
