//! Flight search tool: returns sample fares filtered by budget.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wayfarer_core::error::ToolError;
use wayfarer_core::tool::{Tool, ToolInput};

pub struct SearchFlightsTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Args {
    origin: String,
    destination: String,
    #[allow(dead_code)]
    departure_date: String,
    #[allow(dead_code)]
    return_date: String,
    budget: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Flight {
    airline: &'static str,
    flight_number: &'static str,
    departure: String,
    arrival: String,
    duration: &'static str,
    price: u32,
    #[serde(rename = "class")]
    cabin_class: &'static str,
}

#[async_trait]
impl Tool for SearchFlightsTool {
    fn name(&self) -> &str {
        "search_flights"
    }

    fn description(&self) -> &str {
        "Search for available flights between two cities within a budget"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "origin": {
                    "type": "string",
                    "description": "Origin city or airport code, e.g. \"LOS\" or \"Lagos\""
                },
                "destination": {
                    "type": "string",
                    "description": "Destination city or airport code, e.g. \"NRT\" or \"Tokyo\""
                },
                "departureDate": {
                    "type": "string",
                    "description": "Departure date in YYYY-MM-DD format"
                },
                "returnDate": {
                    "type": "string",
                    "description": "Return date in YYYY-MM-DD format"
                },
                "budget": {
                    "type": "number",
                    "description": "Max total flight budget in USD"
                }
            },
            "required": ["origin", "destination", "departureDate", "returnDate", "budget"]
        })
    }

    async fn execute(&self, input: ToolInput) -> Result<String, ToolError> {
        let args: Args = input.parse()?;

        let flights: Vec<Flight> = sample_flights(&args.origin, &args.destination)
            .into_iter()
            .filter(|f| f64::from(f.price) <= args.budget)
            .collect();

        if flights.is_empty() {
            return Ok(format!(
                "No flights found from {} to {} within ${} budget.",
                args.origin, args.destination, args.budget
            ));
        }

        crate::to_output(&flights)
    }
}

fn sample_flights(origin: &str, destination: &str) -> Vec<Flight> {
    vec![
        Flight {
            airline: "Japan Airlines",
            flight_number: "JL 789",
            departure: format!("{origin} at 23:55"),
            arrival: format!("{destination} at 06:30+1"),
            duration: "13h 35m",
            price: 680,
            cabin_class: "Economy",
        },
        Flight {
            airline: "ANA",
            flight_number: "NH 847",
            departure: format!("{origin} at 21:15"),
            arrival: format!("{destination} at 05:10+1"),
            duration: "14h 55m",
            price: 595,
            cabin_class: "Economy",
        },
    ]
}
