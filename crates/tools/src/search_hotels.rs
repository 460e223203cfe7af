//! Hotel search tool: sample hotels priced for the requested stay.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wayfarer_core::error::ToolError;
use wayfarer_core::tool::{Tool, ToolInput};

pub struct SearchHotelsTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Args {
    #[allow(dead_code)]
    city: String,
    check_in: String,
    check_out: String,
    max_price_per_night: f64,
    #[allow(dead_code)]
    guests: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Hotel {
    name: &'static str,
    location: &'static str,
    price_per_night: u32,
    total_price: i64,
    rating: f32,
    amenities: &'static [&'static str],
}

struct SampleHotel {
    name: &'static str,
    location: &'static str,
    price_per_night: u32,
    rating: f32,
    amenities: &'static [&'static str],
}

const SAMPLE_HOTELS: &[SampleHotel] = &[
    SampleHotel {
        name: "Shinjuku Granbell Hotel",
        location: "Shinjuku, Tokyo",
        price_per_night: 95,
        rating: 4.3,
        amenities: &["WiFi", "Breakfast", "City View"],
    },
    SampleHotel {
        name: "APA Hotel Akihabara",
        location: "Akihabara, Tokyo",
        price_per_night: 72,
        rating: 4.1,
        amenities: &["WiFi", "Gym"],
    },
];

#[async_trait]
impl Tool for SearchHotelsTool {
    fn name(&self) -> &str {
        "search_hotels"
    }

    fn description(&self) -> &str {
        "Find hotels in a city that match budget and dates"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": { "type": "string", "description": "City to search hotels in" },
                "checkIn": { "type": "string", "description": "Check-in date YYYY-MM-DD" },
                "checkOut": { "type": "string", "description": "Check-out date YYYY-MM-DD" },
                "maxPricePerNight": { "type": "number", "description": "Maximum price per night in USD" },
                "guests": { "type": "number", "description": "Number of guests" }
            },
            "required": ["city", "checkIn", "checkOut", "maxPricePerNight", "guests"]
        })
    }

    async fn execute(&self, input: ToolInput) -> Result<String, ToolError> {
        let args: Args = input.parse()?;
        let nights = nights_between(&args.check_in, &args.check_out)?;

        let hotels: Vec<Hotel> = SAMPLE_HOTELS
            .iter()
            .filter(|h| f64::from(h.price_per_night) <= args.max_price_per_night)
            .map(|h| Hotel {
                name: h.name,
                location: h.location,
                price_per_night: h.price_per_night,
                total_price: i64::from(h.price_per_night) * nights,
                rating: h.rating,
                amenities: h.amenities,
            })
            .collect();

        crate::to_output(&hotels)
    }
}

/// Whole nights between two ISO dates.
fn nights_between(check_in: &str, check_out: &str) -> Result<i64, ToolError> {
    let parse = |label: &str, value: &str| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
            ToolError::InvalidArguments(format!("{label} '{value}' is not a YYYY-MM-DD date: {e}"))
        })
    };
    let start = parse("checkIn", check_in)?;
    let end = parse("checkOut", check_out)?;
    Ok((end - start).num_days())
}
