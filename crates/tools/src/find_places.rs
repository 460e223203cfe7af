//! Place finder: top-rated restaurants and attractions in a city.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wayfarer_core::error::ToolError;
use wayfarer_core::tool::{Tool, ToolInput};

pub struct FindPlacesTool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Category {
    Restaurant,
    Attraction,
    Museum,
    Park,
    Shopping,
}

#[derive(Debug, Deserialize)]
struct Args {
    city: String,
    category: Category,
    #[serde(default)]
    #[allow(dead_code)]
    cuisine: Option<String>,
    #[allow(dead_code)]
    budget: String,
}

#[async_trait]
impl Tool for FindPlacesTool {
    fn name(&self) -> &str {
        "find_places"
    }

    fn description(&self) -> &str {
        "Find top-rated restaurants and attractions in a city"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "city": { "type": "string", "description": "City to search in" },
                "category": {
                    "type": "string",
                    "enum": ["restaurant", "attraction", "museum", "park", "shopping"],
                    "description": "Type of place to find"
                },
                "cuisine": {
                    "type": "string",
                    "description": "Cuisine type e.g. \"ramen\", \"sushi\" (restaurants only)"
                },
                "budget": {
                    "type": "string",
                    "enum": ["budget", "mid-range", "luxury"],
                    "description": "Price range preference"
                }
            },
            "required": ["city", "category", "budget"]
        })
    }

    async fn execute(&self, input: ToolInput) -> Result<String, ToolError> {
        let args: Args = input.parse()?;

        // Only restaurants have their own list; everything else shares the sights.
        let results = match args.category {
            Category::Restaurant => restaurants(),
            _ => attractions(),
        };

        crate::to_output(&json!({
            "city": args.city,
            "category": args.category,
            "results": results,
        }))
    }
}

fn restaurants() -> serde_json::Value {
    json!([
        { "name": "Ichiran Ramen Shibuya", "rating": 4.7, "price": "$", "cuisine": "Ramen", "address": "1-22-7 Dogenzaka, Shibuya" },
        { "name": "Sukiyabashi Jiro", "rating": 4.9, "price": "$$$", "cuisine": "Sushi", "address": "4-2-15 Ginza, Chuo" },
        { "name": "Gonpachi Nishi-Azabu", "rating": 4.5, "price": "$$", "cuisine": "Yakitori", "address": "1-13-11 Nishi-Azabu, Minato" }
    ])
}

fn attractions() -> serde_json::Value {
    json!([
        { "name": "Senso-ji Temple", "rating": 4.8, "type": "Temple", "area": "Asakusa", "free": true },
        { "name": "Shibuya Crossing", "rating": 4.9, "type": "Landmark", "area": "Shibuya", "free": true },
        { "name": "teamLab Borderless", "rating": 4.8, "type": "Museum", "area": "Odaiba", "price": "$25" }
    ])
}
