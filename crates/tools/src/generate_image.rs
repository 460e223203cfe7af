//! Image tool: renders a destination image through the provider.
//!
//! Returns the hosted image URL. When the account cannot use the image
//! model, the tool answers with a readable explanation instead of failing,
//! so the planner can finish the itinerary without a picture.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};
use wayfarer_core::error::{ProviderError, ToolError};
use wayfarer_core::provider::{ImageRequest, Provider};
use wayfarer_core::tool::{Tool, ToolInput};

pub struct GenerateImageTool {
    provider: Arc<dyn Provider>,
    model: String,
    size: String,
}

impl GenerateImageTool {
    pub fn new(provider: Arc<dyn Provider>, model: &str, size: &str) -> Self {
        Self {
            provider,
            model: model.to_string(),
            size: size.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Args {
    prompt: String,
}

#[async_trait]
impl Tool for GenerateImageTool {
    fn name(&self) -> &str {
        "generate_image"
    }

    fn description(&self) -> &str {
        "Generate a stunning destination image"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "Cinematic travel photography prompt for the destination"
                }
            },
            "required": ["prompt"]
        })
    }

    async fn execute(&self, input: ToolInput) -> Result<String, ToolError> {
        let args: Args = input.parse()?;
        debug!(model = %self.model, prompt = %args.prompt, "Generating image");

        let request = ImageRequest {
            model: self.model.clone(),
            prompt: args.prompt,
            size: self.size.clone(),
        };

        match self.provider.generate_image(request).await {
            Ok(image) => Ok(image.url),
            Err(ProviderError::ModelAccessDenied(details)) => {
                warn!(model = %self.model, "Image model access denied");
                Ok(format!(
                    "Image generation unavailable: this account does not have access to {}. \
                     Please verify your project permissions.\n\nError Details: {details}",
                    self.model
                ))
            }
            Err(e) => Err(ToolError::Upstream(e.to_string())),
        }
    }
}
