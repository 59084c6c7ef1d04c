use axum::{extract::State, Json};
use serde_json::Value;

use realty_core::types::{TitleDeedQuery, ToolResponse};

use crate::app_state::AppState;
use crate::error::{ApiError, ApiJson};

/// Look up a title deed in the registry.
#[allow(clippy::missing_errors_doc)]
pub async fn verify_title(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TitleDeedQuery>,
) -> Result<Json<ToolResponse<Value>>, ApiError> {
    let payload = state.title_registry.verify(&req.title_deed_number).await?;
    Ok(Json(ToolResponse::ok(payload)))
}
