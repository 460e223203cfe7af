//! Tool trait: the abstraction over agent capabilities.
//!
//! Tools are what let the planner act: search flights and hotels, find
//! places, measure distances, render images. Each tool declares a JSON Schema
//! for its arguments; the same schema is advertised to the LLM and used to
//! check incoming arguments, so the two never drift apart.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::ToolError;

/// A tool description sent to the LLM so it knows what it can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// The tool name (unique key)
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: Value,
}

/// What a tool receives when invoked.
#[derive(Debug, Clone)]
pub struct ToolInput {
    /// The user's original task description
    pub context: String,

    /// Arguments, already checked against the tool's schema
    pub args: Value,
}

impl ToolInput {
    /// Deserialize the arguments into the tool's typed argument struct.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, ToolError> {
        serde_json::from_value(self.args.clone())
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))
    }
}

/// The core Tool trait.
///
/// Tool results are plain text meant for the LLM: structured payloads are
/// serialized JSON, and "nothing found" outcomes are ordinary sentences.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "search_flights").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool.
    async fn execute(&self, input: ToolInput) -> Result<String, ToolError>;

    /// Convert this tool into a ToolSpec for sending to the LLM.
    fn to_spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

struct Registered {
    spec: ToolSpec,
    tool: Box<dyn Tool>,
}

/// A registry of available tools, keyed by name.
///
/// Populated once at startup, then shared read-only (usually behind an `Arc`)
/// by the dispatcher and the gateway request builder.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Registered>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool after checking its name and schema.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), ToolError> {
        let spec = tool.to_spec();
        if spec.name.trim().is_empty() {
            return Err(ToolError::InvalidSchema {
                tool_name: spec.name,
                reason: "tool name must not be empty".into(),
            });
        }
        if self.tools.contains_key(&spec.name) {
            return Err(ToolError::DuplicateName(spec.name));
        }
        check_schema(&spec)?;

        tracing::debug!(tool = %spec.name, "Registered tool");
        self.tools.insert(spec.name.clone(), Registered { spec, tool });
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|r| r.tool.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tool specs, sorted by name.
    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|r| r.spec.clone()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// List all registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Check arguments against the schema that was advertised for `name`.
    pub fn validate_arguments(&self, name: &str, args: &Value) -> Result<(), ToolError> {
        let registered = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        validate_against(&registered.spec.parameters, args)
    }
}

/// Registration-time schema check: an object schema whose required keys exist.
fn check_schema(spec: &ToolSpec) -> Result<(), ToolError> {
    let invalid = |reason: &str| ToolError::InvalidSchema {
        tool_name: spec.name.clone(),
        reason: reason.to_string(),
    };

    if spec.parameters.get("type").and_then(Value::as_str) != Some("object") {
        return Err(invalid("top-level \"type\" must be \"object\""));
    }
    let properties = spec
        .parameters
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("\"properties\" must be an object"))?;

    if let Some(required) = spec.parameters.get("required") {
        let required = required
            .as_array()
            .ok_or_else(|| invalid("\"required\" must be an array"))?;
        for key in required {
            let key = key
                .as_str()
                .ok_or_else(|| invalid("\"required\" entries must be strings"))?;
            if !properties.contains_key(key) {
                return Err(invalid(&format!("required key '{key}' is not a property")));
            }
        }
    }
    Ok(())
}

fn validate_against(schema: &Value, args: &Value) -> Result<(), ToolError> {
    let obj = args
        .as_object()
        .ok_or_else(|| ToolError::InvalidArguments("arguments must be a JSON object".into()))?;

    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    for key in &required {
        match obj.get(*key) {
            None | Some(Value::Null) => {
                return Err(ToolError::InvalidArguments(format!(
                    "missing required argument '{key}'"
                )));
            }
            Some(_) => {}
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    for (key, value) in obj {
        let Some(prop) = properties.get(key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        if let Some(expected) = prop.get("type").and_then(Value::as_str) {
            let matches = match expected {
                "string" => value.is_string(),
                "number" => value.is_number(),
                "integer" => value.is_i64() || value.is_u64(),
                "boolean" => value.is_boolean(),
                "array" => value.is_array(),
                "object" => value.is_object(),
                _ => true,
            };
            if !matches {
                return Err(ToolError::InvalidArguments(format!(
                    "argument '{key}' must be of type {expected}"
                )));
            }
        }
        if let Some(allowed) = prop.get("enum").and_then(Value::as_array) {
            if !allowed.contains(value) {
                return Err(ToolError::InvalidArguments(format!(
                    "argument '{key}' must be one of {}",
                    Value::Array(allowed.clone())
                )));
            }
        }
    }
    Ok(())
}
