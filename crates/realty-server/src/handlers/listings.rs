use axum::{extract::State, Json};
use serde_json::Value;

use realty_core::types::{ListingQuery, ToolResponse, LISTING_PAGE};

use crate::app_state::AppState;
use crate::error::{ApiError, ApiJson};

/// Forward a listing search upstream and return its payload with a hit count.
#[allow(clippy::missing_errors_doc)]
pub async fn search_listings(
    State(state): State<AppState>,
    ApiJson(query): ApiJson<ListingQuery>,
) -> Result<Json<ToolResponse<Value>>, ApiError> {
    let results = state.listings.search(&query).await?;

    Ok(Json(ToolResponse::ok(results.payload).with_meta(
        serde_json::json!({
            "total": results.total,
            "page": LISTING_PAGE,
        }),
    )))
}
