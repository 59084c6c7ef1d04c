use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LISTINGS_BASE_URL: &str = "https://bayut.p.rapidapi.com";
pub const DEFAULT_TITLE_REGISTRY_BASE_URL: &str = "https://dubairest.gov.ae";

/// Placeholder values shipped in sample env files; treated as "not configured".
const PLACEHOLDER_CREDENTIALS: &[&str] = &[
    "demo",
    "your_rapidapi_key_here",
    "your_dubai_rest_key_here",
];

/// Connection settings for one upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    #[serde(default)]
    pub credential: Option<String>,
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>, credential: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credential,
        }
    }

    /// The credential, unless it is empty or a known placeholder.
    pub fn credential(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .filter(|c| {
                !PLACEHOLDER_CREDENTIALS
                    .iter()
                    .any(|p| p.eq_ignore_ascii_case(c))
            })
    }
}

/// Top-level gateway configuration, built once at startup and handed to each component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub listings: UpstreamConfig,
    pub title_registry: UpstreamConfig,
    pub upstream_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            listings: UpstreamConfig::new(DEFAULT_LISTINGS_BASE_URL, None),
            title_registry: UpstreamConfig::new(DEFAULT_TITLE_REGISTRY_BASE_URL, None),
            upstream_timeout_secs: 30,
        }
    }
}

impl GatewayConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
