use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;
use crate::types::{ListingQuery, ListingResults};

/// Remote property-listing search service.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Run a search with fixed pagination and sort order, returning the raw payload.
    async fn search(&self, query: &ListingQuery) -> Result<ListingResults, Error>;
}

/// Remote title-deed registry.
#[async_trait]
pub trait TitleRegistry: Send + Sync {
    /// Look up a deed by its registry number, returning the raw payload.
    async fn verify(&self, title_deed_number: &str) -> Result<Value, Error>;
}
