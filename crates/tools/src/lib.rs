//! Travel planning tools for Wayfarer.
//!
//! Flights, hotels, places and distances are served from deterministic
//! sample data so runs are reproducible; image generation goes through the
//! configured provider.

pub mod find_places;
pub mod generate_image;
pub mod get_distance;
pub mod search_flights;
pub mod search_hotels;

use std::sync::Arc;
use wayfarer_config::ImageConfig;
use wayfarer_core::error::ToolError;
use wayfarer_core::provider::Provider;
use wayfarer_core::tool::ToolRegistry;

pub use find_places::FindPlacesTool;
pub use generate_image::GenerateImageTool;
pub use get_distance::GetDistanceTool;
pub use search_flights::SearchFlightsTool;
pub use search_hotels::SearchHotelsTool;

/// Create a registry with all five travel tools.
pub fn default_registry(
    provider: Arc<dyn Provider>,
    image: &ImageConfig,
) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(SearchFlightsTool))?;
    registry.register(Box::new(SearchHotelsTool))?;
    registry.register(Box::new(FindPlacesTool))?;
    registry.register(Box::new(GetDistanceTool))?;
    registry.register(Box::new(GenerateImageTool::new(
        provider,
        &image.model,
        &image.size,
    )))?;
    Ok(registry)
}

/// Serialize a tool payload the way every tool returns it: pretty JSON.
pub(crate) fn to_output<T: serde::Serialize>(value: &T) -> Result<String, ToolError> {
    serde_json::to_string_pretty(value).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
}
