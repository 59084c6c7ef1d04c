use axum::{http::Uri, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use realty_mcp::{ToolDescriptor, ToolRegistry};

use crate::error::ApiError;

/// Liveness report.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        timestamp: Utc::now(),
    })
}

#[derive(Debug, Serialize)]
pub struct ToolCatalog {
    pub tools: Vec<ToolDescriptor>,
}

/// List all tools.
pub async fn list_tools() -> Json<ToolCatalog> {
    Json(ToolCatalog {
        tools: ToolRegistry::definitions(),
    })
}

/// Fallback for unrouted paths.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}
