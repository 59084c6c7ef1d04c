use axum::{extract::State, Json};

use realty_core::chiller::{ChillerComparison, ChillerEstimate, ChillerRate};
use realty_core::types::{ChillerComparisonQuery, ChillerQuery, ToolResponse};

use crate::app_state::AppState;
use crate::error::{ApiError, ApiJson};

/// Estimate annual chiller cost. No network access.
#[allow(clippy::missing_errors_doc)]
pub async fn calculate_chiller_cost(
    State(state): State<AppState>,
    ApiJson(query): ApiJson<ChillerQuery>,
) -> Result<Json<ToolResponse<ChillerEstimate>>, ApiError> {
    let estimate = state.rates.estimate(&query)?;
    tracing::debug!(
        provider = %estimate.provider,
        total = estimate.total_annual_cost_aed,
        "chiller estimate"
    );
    Ok(Json(ToolResponse::ok(estimate)))
}

/// Rank several buildings by chiller cost per square foot.
#[allow(clippy::missing_errors_doc)]
pub async fn compare_chiller_costs(
    State(state): State<AppState>,
    ApiJson(query): ApiJson<ChillerComparisonQuery>,
) -> Result<Json<ToolResponse<ChillerComparison>>, ApiError> {
    let comparison = state.rates.compare(&query)?;
    tracing::debug!(buildings = comparison.comparison.len(), "chiller comparison");
    Ok(Json(ToolResponse::ok(comparison)))
}

/// List the provider tariffs the calculator knows.
pub async fn list_providers(State(state): State<AppState>) -> Json<ToolResponse<Vec<ChillerRate>>> {
    Json(ToolResponse::ok(state.rates.rates().to_vec()))
}
