use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use realty_core::config::UpstreamConfig;
use realty_core::error::Error;
use realty_core::traits::TitleRegistry;

use crate::http;

const SERVICE: &str = "title registry";

/// Bearer-token client for the land department's title-deed lookup.
#[derive(Debug, Clone)]
pub struct TitleRegistryClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl TitleRegistryClient {
    /// Create a client from its upstream settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig, timeout: Duration) -> Result<Self, Error> {
        Ok(Self {
            http: http::build_client(timeout)?,
            base_url: http::parse_base_url(SERVICE, &config.base_url)?,
            token: config.credential().map(str::to_string),
        })
    }

    /// The deed number is encoded as a single path segment.
    fn deed_url(&self, title_deed_number: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "property", "title-deed", title_deed_number]);
        }
        url
    }
}

#[async_trait]
impl TitleRegistry for TitleRegistryClient {
    async fn verify(&self, title_deed_number: &str) -> Result<Value, Error> {
        let number = title_deed_number.trim();
        if number.is_empty() {
            return Err(Error::InvalidInput(
                "title_deed_number must not be empty".to_string(),
            ));
        }

        let token = self
            .token
            .as_deref()
            .ok_or(Error::MissingCredential("title registry token"))?;

        tracing::info!(title_deed_number = %number, "verifying title deed");

        let request = self.http.get(self.deed_url(number)).bearer_auth(token);
        http::get_json(SERVICE, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deed_number_is_one_segment() {
        let config = UpstreamConfig::new("https://registry.example.com", Some("t".into()));
        let client = TitleRegistryClient::new(&config, Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.deed_url("TD/2024 7").as_str(),
            "https://registry.example.com/api/property/title-deed/TD%2F2024%207"
        );
    }
}
