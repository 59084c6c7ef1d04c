use std::sync::Arc;

use realty_core::chiller::RateTable;
use realty_core::config::GatewayConfig;
use realty_core::error::Error;
use realty_core::traits::{ListingSource, TitleRegistry};
use realty_upstream::{ListingsClient, TitleRegistryClient};

/// Shared application state with injected dependencies.
#[derive(Clone)]
pub struct AppState {
    pub listings: Arc<dyn ListingSource>,
    pub title_registry: Arc<dyn TitleRegistry>,
    pub rates: Arc<RateTable>,
}

impl AppState {
    /// Build the live upstream clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an upstream base URL is invalid.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, Error> {
        let timeout = config.upstream_timeout();
        Ok(Self {
            listings: Arc::new(ListingsClient::new(&config.listings, timeout)?),
            title_registry: Arc::new(TitleRegistryClient::new(&config.title_registry, timeout)?),
            rates: Arc::new(RateTable::default()),
        })
    }
}
