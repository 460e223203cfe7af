//! OpenAI-compatible provider implementation.
//!
//! Works with OpenAI and any endpoint exposing `/v1/chat/completions`
//! (OpenRouter, vLLM, Ollama, ...). Image generation uses
//! `/v1/images/generations` and is only expected to work against OpenAI.
//!
//! No retries: a failed request is returned to the caller as-is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wayfarer_config::AppConfig;
use wayfarer_core::error::ProviderError;
use wayfarer_core::message::{AssistantMessage, Message, ToolCallRequest};
use wayfarer_core::provider::*;
use wayfarer_core::tool::ToolSpec;

/// An OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Build from configuration. Fails if no API key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .require_api_key()
            .map_err(|e| ProviderError::NotConfigured(e.to_string()))?;
        Self::new("openai", &config.base_url, api_key)
    }

    /// Convert our Message types to OpenAI API format.
    ///
    /// The system prompt, when present, goes first.
    fn to_api_messages(system_prompt: Option<&str>, messages: &[Message]) -> Vec<ApiMessage> {
        let system = system_prompt.map(|prompt| ApiMessage {
            role: "system".into(),
            content: Some(prompt.to_string()),
            tool_calls: None,
            tool_call_id: None,
        });

        system
            .into_iter()
            .chain(messages.iter().map(|m| match m {
                Message::User { content } => ApiMessage {
                    role: "user".into(),
                    content: Some(content.clone()),
                    tool_calls: None,
                    tool_call_id: None,
                },
                Message::Assistant(reply) => {
                    let calls = reply.requested_calls();
                    ApiMessage {
                        role: "assistant".into(),
                        content: reply.content().map(str::to_string),
                        tool_calls: if calls.is_empty() {
                            None
                        } else {
                            Some(
                                calls
                                    .iter()
                                    .map(|tc| ApiToolCall {
                                        id: tc.id.clone(),
                                        r#type: "function".into(),
                                        function: ApiFunction {
                                            name: tc.name.clone(),
                                            arguments: tc.arguments.clone(),
                                        },
                                    })
                                    .collect(),
                            )
                        },
                        tool_call_id: None,
                    }
                }
                Message::Tool {
                    tool_call_id,
                    content,
                } => ApiMessage {
                    role: "tool".into(),
                    content: Some(content.clone()),
                    tool_calls: None,
                    tool_call_id: Some(tool_call_id.clone()),
                },
            }))
            .collect()
    }

    /// Convert tool specs to OpenAI API format.
    fn to_api_tools(tools: &[ToolSpec]) -> Vec<ApiToolDefinition> {
        tools
            .iter()
            .map(|t| ApiToolDefinition {
                r#type: "function".into(),
                function: ApiToolFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    }

    /// Turn the API's assistant message into ours. Tool calls win over text.
    fn to_assistant_message(api: ApiMessage) -> AssistantMessage {
        let tool_calls: Vec<ToolCallRequest> = api
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCallRequest {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        if tool_calls.is_empty() {
            AssistantMessage::answer(api.content.unwrap_or_default())
        } else {
            if tool_calls.len() > 1 {
                debug!(
                    count = tool_calls.len(),
                    "Model requested several tool calls; only the first will run"
                );
            }
            AssistantMessage::tool_calls(tool_calls)
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            let parsed: Option<ApiErrorEnvelope> = serde_json::from_str(&error_body).ok();
            let (code, message) = parsed
                .map(|e| (e.error.code, e.error.message))
                .unwrap_or((None, error_body));

            if status == 403 || code.as_deref() == Some("model_not_found") {
                return Err(ProviderError::ModelAccessDenied(message));
            }
            return Err(ProviderError::ApiError {
                status_code: status,
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(request.system_prompt.as_deref(), &request.messages),
            "temperature": request.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&request.tools));
        }

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice =
            api_response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::ApiError {
                    status_code: 200,
                    message: "No choices in response".into(),
                })?;

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ProviderResponse {
            message: Self::to_assistant_message(choice.message),
            usage,
            model: api_response.model,
        })
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<ImageResponse, ProviderError> {
        let url = format!("{}/images/generations", self.base_url);

        let body = serde_json::json!({
            "model": request.model,
            "prompt": request.prompt,
            "n": 1,
            "size": request.size,
        });

        debug!(provider = %self.name, model = %request.model, "Sending image generation request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let api_resp: ImageApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse image response: {e}"),
            })?;

        let url = api_resp
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .ok_or_else(|| ProviderError::ApiError {
                status_code: 200,
                message: "Image generation failed: no URL returned".into(),
            })?;

        Ok(ImageResponse { url })
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    r#type: String,
    function: ApiFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolDefinition {
    r#type: String,
    function: ApiToolFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ImageApiResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_core::message::NextAction;

    #[test]
    fn openai_constructor() {
        let provider = OpenAiCompatProvider::openai("sk-test").unwrap();
        assert_eq!(provider.name(), "openai");
        assert!(provider.base_url.contains("api.openai.com"));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let provider = OpenAiCompatProvider::new("local", "http://localhost:8000/v1/", "x").unwrap();
        assert_eq!(provider.base_url, "http://localhost:8000/v1");
    }

    #[test]
    fn from_config_requires_key() {
        let config = AppConfig::default();
        let err = OpenAiCompatProvider::from_config(&config).err().unwrap();
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        let config = AppConfig {
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        assert!(OpenAiCompatProvider::from_config(&config).is_ok());
    }

    #[test]
    fn system_prompt_goes_first() {
        let messages = vec![Message::user("Plan a trip to Osaka")];
        let api = OpenAiCompatProvider::to_api_messages(Some("You are a planner"), &messages);
        assert_eq!(api.len(), 2);
        assert_eq!(api[0].role, "system");
        assert_eq!(api[1].role, "user");

        let api = OpenAiCompatProvider::to_api_messages(None, &messages);
        assert_eq!(api.len(), 1);
    }

    #[test]
    fn message_conversion_with_tool_calls() {
        let msg: Message = AssistantMessage::tool_call(ToolCallRequest::new(
            "call_1",
            "search_flights",
            r#"{"origin":"LAX"}"#,
        ))
        .into();
        let api = OpenAiCompatProvider::to_api_messages(None, &[msg]);
        let tc = api[0].tool_calls.as_ref().unwrap();
        assert_eq!(tc.len(), 1);
        assert_eq!(tc[0].function.name, "search_flights");
        assert!(api[0].content.is_none());
    }

    #[test]
    fn message_conversion_tool_response() {
        let api =
            OpenAiCompatProvider::to_api_messages(None, &[Message::tool_result("call_1", "[]")]);
        assert_eq!(api[0].role, "tool");
        assert_eq!(api[0].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn tool_spec_conversion() {
        let tools = vec![ToolSpec {
            name: "get_distance".into(),
            description: "Distance between two places".into(),
            parameters: serde_json::json!({"type": "object", "properties": {}}),
        }];
        let api_tools = OpenAiCompatProvider::to_api_tools(&tools);
        assert_eq!(api_tools.len(), 1);
        assert_eq!(api_tools[0].function.name, "get_distance");
        assert_eq!(api_tools[0].r#type, "function");
    }

    #[test]
    fn parse_tool_call_response() {
        let data = r#"{
            "model": "gpt-4o-mini",
            "choices": [{"message": {"role": "assistant", "content": null, "tool_calls": [
                {"id": "call_a", "type": "function", "function": {"name": "search_hotels", "arguments": "{}"}},
                {"id": "call_b", "type": "function", "function": {"name": "find_places", "arguments": "{}"}}
            ]}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let choice = parsed.choices.into_iter().next().unwrap();
        let msg = OpenAiCompatProvider::to_assistant_message(choice.message);
        match msg.next_action() {
            NextAction::CallTool(call) => assert_eq!(call.name, "search_hotels"),
            other => panic!("expected a tool call, got {other:?}"),
        }
        assert_eq!(msg.requested_calls().len(), 2);
    }

    #[test]
    fn parse_text_response() {
        let data = r#"{
            "model": "gpt-4o-mini",
            "choices": [{"message": {"role": "assistant", "content": "Day 1: Dotonbori"}}]
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.usage.is_none());
        let choice = parsed.choices.into_iter().next().unwrap();
        let msg = OpenAiCompatProvider::to_assistant_message(choice.message);
        assert_eq!(msg.next_action(), NextAction::Answer("Day 1: Dotonbori"));
    }

    #[test]
    fn parse_error_envelope() {
        let body = r#"{"error":{"code":"model_not_found","message":"The model dall-e-3 does not exist"}}"#;
        let parsed: ApiErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.code.as_deref(), Some("model_not_found"));
        assert!(parsed.error.message.contains("dall-e-3"));
    }

    #[test]
    fn parse_image_response() {
        let body = r#"{"created": 1, "data": [{"url": "https://example.blob.core.windows.net/img.png"}]}"#;
        let parsed: ImageApiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.data[0].url.as_deref(),
            Some("https://example.blob.core.windows.net/img.png")
        );
    }

    fn http_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn success_passes_through() {
        let response = OpenAiCompatProvider::check_status(http_response(200, "{}")).await;
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn unauthorized_is_authentication_failure() {
        let err = OpenAiCompatProvider::check_status(http_response(401, "bad key"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let err = OpenAiCompatProvider::check_status(http_response(429, ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn forbidden_is_model_access_denied() {
        let body = r#"{"error":{"code":null,"message":"Project lacks access to dall-e-3"}}"#;
        let err = OpenAiCompatProvider::check_status(http_response(403, body))
            .await
            .unwrap_err();
        match err {
            ProviderError::ModelAccessDenied(message) => {
                assert_eq!(message, "Project lacks access to dall-e-3");
            }
            other => panic!("expected ModelAccessDenied, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn model_not_found_code_is_access_denied_on_any_status() {
        let body = r#"{"error":{"code":"model_not_found","message":"The model dall-e-3 does not exist"}}"#;
        let err = OpenAiCompatProvider::check_status(http_response(400, body))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ModelAccessDenied(m) if m.contains("dall-e-3")));
    }

    #[tokio::test]
    async fn other_statuses_are_api_errors() {
        let err = OpenAiCompatProvider::check_status(http_response(500, "upstream exploded"))
            .await
            .unwrap_err();
        match err {
            ProviderError::ApiError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }
}
