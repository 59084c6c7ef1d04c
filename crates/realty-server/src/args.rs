use clap::Parser;

use realty_core::config::{
    GatewayConfig, UpstreamConfig, DEFAULT_LISTINGS_BASE_URL, DEFAULT_TITLE_REGISTRY_BASE_URL,
};

/// Command-line and environment settings for the gateway server.
#[derive(Debug, Parser)]
#[command(name = "realty-server", about = "HTTP gateway for real-estate data tools")]
pub struct ServerArgs {
    /// Interface to bind
    #[arg(long, env = "REALTY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// RapidAPI key for the listing search API
    #[arg(long, env = "BAYUT_API_KEY", hide_env_values = true)]
    pub bayut_api_key: Option<String>,

    /// Listing search API base URL
    #[arg(long, env = "BAYUT_BASE_URL", default_value = DEFAULT_LISTINGS_BASE_URL)]
    pub bayut_base_url: String,

    /// Bearer token for the title registry API
    #[arg(long, env = "DUBAI_REST_API_KEY", hide_env_values = true)]
    pub dubai_rest_api_key: Option<String>,

    /// Title registry API base URL
    #[arg(long, env = "DUBAI_REST_BASE_URL", default_value = DEFAULT_TITLE_REGISTRY_BASE_URL)]
    pub dubai_rest_base_url: String,

    /// Per-request timeout for upstream calls, in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub upstream_timeout_secs: u64,
}

impl From<ServerArgs> for GatewayConfig {
    fn from(args: ServerArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            listings: UpstreamConfig::new(args.bayut_base_url, args.bayut_api_key),
            title_registry: UpstreamConfig::new(args.dubai_rest_base_url, args.dubai_rest_api_key),
            upstream_timeout_secs: args.upstream_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_config() {
        let args = ServerArgs::try_parse_from([
            "realty-server",
            "--port",
            "8080",
            "--bayut-api-key",
            "k",
            "--dubai-rest-base-url",
            "http://localhost:9000",
        ])
        .unwrap();
        let config = GatewayConfig::from(args);

        assert_eq!(config.port, 8080);
        assert_eq!(config.listings.credential(), Some("k"));
        assert_eq!(config.listings.base_url, DEFAULT_LISTINGS_BASE_URL);
        assert_eq!(config.title_registry.base_url, "http://localhost:9000");
        assert_eq!(config.upstream_timeout_secs, 30);
    }
}
