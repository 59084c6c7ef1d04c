use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A gateway tool: the HTTP endpoint that serves it and the body it expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub endpoint: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Static catalog of the tools the gateway exposes.
pub struct ToolRegistry;

impl ToolRegistry {
    /// Return the tool descriptors in their published order.
    #[must_use]
    pub fn definitions() -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor {
                name: "search_listings".to_string(),
                endpoint: "/api/bayut/search".to_string(),
                description: "Search property listings by location and purpose, most recent first.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "location": {
                            "type": "string",
                            "description": "Upstream location external id"
                        },
                        "purpose": {
                            "type": "string",
                            "enum": ["for-sale", "for-rent"]
                        },
                        "min_price": { "type": "integer" },
                        "max_price": { "type": "integer" },
                        "property_type": {
                            "type": "string",
                            "description": "apartment, villa or townhouse"
                        }
                    },
                    "required": ["location", "purpose"]
                }),
            },
            ToolDescriptor {
                name: "verify_title_deed".to_string(),
                endpoint: "/api/dubai-rest/verify-title".to_string(),
                description: "Verify a title deed against the land registry.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "title_deed_number": { "type": "string" }
                    },
                    "required": ["title_deed_number"]
                }),
            },
            ToolDescriptor {
                name: "calculate_chiller_cost".to_string(),
                endpoint: "/api/chiller/calculate".to_string(),
                description: "Estimate annual district-cooling cost for a property.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "provider": { "type": "string" },
                        "area_sqft": {
                            "type": "number",
                            "description": "Property area in square feet"
                        },
                        "estimated_consumption_kwh": {
                            "type": "number",
                            "description": "Annual consumption override; defaults to 12 kWh per sqft"
                        }
                    },
                    "required": ["provider", "area_sqft"]
                }),
            },
        ]
    }
}
