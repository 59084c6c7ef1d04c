use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use realty_core::config::UpstreamConfig;
use realty_core::error::Error;
use realty_core::traits::ListingSource;
use realty_core::types::{
    ListingQuery, ListingResults, LISTING_PAGE, LISTING_PAGE_SIZE, LISTING_SORT,
};

use crate::http;

const SERVICE: &str = "listing search";

/// RapidAPI-hosted property-listing search client.
#[derive(Debug, Clone)]
pub struct ListingsClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl ListingsClient {
    /// Create a client from its upstream settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig, timeout: Duration) -> Result<Self, Error> {
        Ok(Self {
            http: http::build_client(timeout)?,
            base_url: http::parse_base_url(SERVICE, &config.base_url)?,
            api_key: config.credential().map(str::to_string),
        })
    }

    fn endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["properties", "list"]);
        }
        url
    }

    fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }
}

fn query_params(query: &ListingQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("locationExternalIDs", query.location.clone()),
        ("purpose", query.purpose.clone()),
        ("hitsPerPage", LISTING_PAGE_SIZE.to_string()),
        ("page", LISTING_PAGE.to_string()),
        ("lang", "en".to_string()),
        ("sort", LISTING_SORT.to_string()),
    ];
    if let Some(min) = &query.min_price {
        params.push(("priceMin", min.to_string()));
    }
    if let Some(max) = &query.max_price {
        params.push(("priceMax", max.to_string()));
    }
    if let Some(category) = query.category_external_id() {
        params.push(("categoryExternalID", category.to_string()));
    }
    params
}

#[async_trait]
impl ListingSource for ListingsClient {
    async fn search(&self, query: &ListingQuery) -> Result<ListingResults, Error> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(Error::MissingCredential("listing search API key"))?;

        tracing::info!(
            location = %query.location,
            purpose = %query.purpose,
            "searching listings"
        );

        let request = self
            .http
            .get(self.endpoint())
            .query(&query_params(query))
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", self.host());

        let payload = http::get_json(SERVICE, request).await?;
        let results = ListingResults::from_payload(payload);
        tracing::debug!(total = results.total, "listing search complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pagination_and_sort() {
        let params = query_params(&ListingQuery {
            location: "5002".into(),
            purpose: "for-rent".into(),
            ..ListingQuery::default()
        });
        assert!(params.contains(&("hitsPerPage", "25".to_string())));
        assert!(params.contains(&("page", "0".to_string())));
        assert!(params.contains(&("sort", "date-desc".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "priceMin"));
        assert!(!params.iter().any(|(k, _)| *k == "categoryExternalID"));
    }

    #[test]
    fn optional_filters_forwarded() {
        let params = query_params(&ListingQuery {
            location: "5002".into(),
            purpose: "for-sale".into(),
            min_price: Some(1_000_000_u64.into()),
            max_price: serde_json::Number::from_f64(2_500_000.5),
            property_type: Some("villa".into()),
        });
        assert!(params.contains(&("priceMin", "1000000".to_string())));
        assert!(params.contains(&("priceMax", "2500000.5".to_string())));
        assert!(params.contains(&("categoryExternalID", "3".to_string())));
    }

    #[test]
    fn endpoint_joins_base_path() {
        let config = UpstreamConfig::new("https://api.example.com/v2/", Some("k".into()));
        let client = ListingsClient::new(&config, Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://api.example.com/v2/properties/list"
        );
        assert_eq!(client.host(), "api.example.com");
    }
}
