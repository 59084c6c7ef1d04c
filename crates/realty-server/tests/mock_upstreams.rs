use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use realty_core::error::Error;
use realty_core::traits::{ListingSource, TitleRegistry};
use realty_core::types::{ListingQuery, ListingResults};

/// In-memory listing search that records every query it receives.
#[derive(Default)]
pub struct MockListings {
    fail_with_status: Option<u16>,
    queries: Mutex<Vec<ListingQuery>>,
}

impl MockListings {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose upstream always answers with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<ListingQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingSource for MockListings {
    async fn search(&self, query: &ListingQuery) -> Result<ListingResults, Error> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(status) = self.fail_with_status {
            return Err(Error::UpstreamStatus {
                service: "listing search",
                status,
            });
        }
        Ok(ListingResults::from_payload(json!({
            "nbHits": 128,
            "hits": [
                {"id": 1, "title": "2BR Marina Gate", "price": 2_500_000},
                {"id": 2, "title": "1BR Cayan Tower", "price": 1_350_000},
            ]
        })))
    }
}

/// In-memory title registry keyed by deed number.
#[derive(Default)]
pub struct MockTitleRegistry {
    unreachable: bool,
}

impl MockTitleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self { unreachable: true }
    }
}

#[async_trait]
impl TitleRegistry for MockTitleRegistry {
    async fn verify(&self, title_deed_number: &str) -> Result<Value, Error> {
        if self.unreachable {
            return Err(Error::UpstreamUnavailable {
                service: "title registry",
                reason: "connection failed".to_string(),
            });
        }
        Ok(json!({
            "title_deed_number": title_deed_number,
            "status": "VERIFIED",
            "ownership_type": "Freehold",
        }))
    }
}
