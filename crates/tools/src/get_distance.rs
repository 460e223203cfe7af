//! Distance tool: travel time between two points in a city.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wayfarer_core::error::ToolError;
use wayfarer_core::tool::{Tool, ToolInput};

pub struct GetDistanceTool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Mode {
    Walking,
    Transit,
    Driving,
}

impl Mode {
    fn duration(self) -> &'static str {
        match self {
            Mode::Walking => "38 mins",
            Mode::Transit => "12 mins",
            Mode::Driving => "8 mins",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Args {
    origin: String,
    destination: String,
    mode: Mode,
}

#[derive(Debug, Serialize)]
struct Route {
    origin: String,
    destination: String,
    mode: Mode,
    distance: &'static str,
    duration: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tip: Option<&'static str>,
}

#[async_trait]
impl Tool for GetDistanceTool {
    fn name(&self) -> &str {
        "get_distance"
    }

    fn description(&self) -> &str {
        "Get travel time and distance between two locations in a city"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "origin": { "type": "string", "description": "Starting location or landmark" },
                "destination": { "type": "string", "description": "Ending location or landmark" },
                "mode": {
                    "type": "string",
                    "enum": ["walking", "transit", "driving"],
                    "description": "Mode of transport"
                }
            },
            "required": ["origin", "destination", "mode"]
        })
    }

    async fn execute(&self, input: ToolInput) -> Result<String, ToolError> {
        let args: Args = input.parse()?;

        let route = Route {
            origin: args.origin,
            destination: args.destination,
            mode: args.mode,
            distance: "3.2 km",
            duration: args.mode.duration(),
            tip: (args.mode == Mode::Transit)
                .then_some("Take the Yamanote Line, it runs every 2-3 minutes"),
        };

        crate::to_output(&route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn route(mode: &str) -> serde_json::Value {
        let output = GetDistanceTool
            .execute(ToolInput {
                context: String::new(),
                args: serde_json::json!({
                    "origin": "Osaka Castle",
                    "destination": "Dotonbori",
                    "mode": mode
                }),
            })
            .await
            .unwrap();
        serde_json::from_str(&output).unwrap()
    }

    #[tokio::test]
    async fn durations_depend_on_mode() {
        assert_eq!(route("walking").await["duration"], "38 mins");
        assert_eq!(route("transit").await["duration"], "12 mins");
        assert_eq!(route("driving").await["duration"], "8 mins");
    }

    #[tokio::test]
    async fn only_transit_gets_a_tip() {
        assert!(route("transit").await["tip"].is_string());
        assert!(route("walking").await.get("tip").is_none());
    }
}
