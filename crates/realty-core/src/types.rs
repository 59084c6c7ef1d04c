use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Uniform JSON wrapper returned by every tool endpoint.
///
/// Serializes as `{success: true, data, meta?}` or `{success: false, error}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse<T = Value> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ToolResponse<T> {
    /// Create a success envelope.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: None,
            error: None,
        }
    }

    /// Attach pagination or count metadata to a success envelope.
    #[must_use]
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl ToolResponse<Value> {
    /// Create a failure envelope.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            meta: None,
            error: Some(message.into()),
        }
    }
}

/// Parameters for a property-listing search.
///
/// Prices are forwarded verbatim, so any JSON number is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingQuery {
    pub location: String,
    pub purpose: String,
    #[serde(default)]
    pub min_price: Option<Number>,
    #[serde(default)]
    pub max_price: Option<Number>,
    #[serde(default)]
    pub property_type: Option<String>,
}

/// Fixed page size used for every listing search.
pub const LISTING_PAGE_SIZE: u32 = 25;

/// Only the first page is ever requested.
pub const LISTING_PAGE: u32 = 0;

/// Upstream sort order: most recent first.
pub const LISTING_SORT: &str = "date-desc";

impl ListingQuery {
    /// Upstream category identifier for the requested property type.
    ///
    /// Unrecognised types fall back to apartments.
    pub fn category_external_id(&self) -> Option<&'static str> {
        self.property_type
            .as_deref()
            .map(|t| match t.trim().to_ascii_lowercase().as_str() {
                "villa" => "3",
                "townhouse" => "18",
                _ => "4",
            })
    }
}

/// Raw upstream search payload plus the hit count pulled out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingResults {
    pub payload: Value,
    pub total: u64,
}

impl ListingResults {
    /// Wrap an upstream payload, reading the total from its `nbHits` field.
    pub fn from_payload(payload: Value) -> Self {
        let total = payload.get("nbHits").and_then(Value::as_u64).unwrap_or(0);
        Self { payload, total }
    }
}

/// Parameters for a title-deed lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDeedQuery {
    pub title_deed_number: String,
}

/// Parameters for a chiller cost estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChillerQuery {
    pub provider: String,
    pub area_sqft: f64,
    #[serde(default)]
    pub estimated_consumption_kwh: Option<f64>,
}

/// One building in a chiller comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingQuery {
    pub name: String,
    pub provider: String,
    pub area_sqft: f64,
}

/// Parameters for ranking several buildings by chiller cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChillerComparisonQuery {
    pub buildings: Vec<BuildingQuery>,
}
