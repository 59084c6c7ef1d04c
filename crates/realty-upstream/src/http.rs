use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;

use realty_core::error::Error;

/// Longest slice of an upstream error body kept in the log.
const LOGGED_BODY_LIMIT: usize = 512;

/// Build the shared HTTP client for one upstream.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, Error> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Internal(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn parse_base_url(service: &'static str, base_url: &str) -> Result<Url, Error> {
    let url = Url::parse(base_url)
        .map_err(|e| Error::Internal(format!("invalid {service} base URL '{base_url}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::Internal(format!(
            "invalid {service} base URL '{base_url}'"
        )));
    }
    Ok(url)
}

/// Send a request and decode a JSON body, classifying every failure.
///
/// Upstream bodies and transport details are logged, never returned.
pub(crate) async fn get_json(service: &'static str, request: RequestBuilder) -> Result<Value, Error> {
    let response = request.send().await.map_err(|e| {
        tracing::warn!(service, error = %e, "upstream request failed");
        Error::UpstreamUnavailable {
            service,
            reason: classify(&e).to_string(),
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            service,
            %status,
            body = %truncate(&body, LOGGED_BODY_LIMIT),
            "upstream returned an error status"
        );
        return Err(Error::UpstreamStatus {
            service,
            status: status.as_u16(),
        });
    }

    response.json::<Value>().await.map_err(|e| {
        tracing::warn!(service, error = %e, "upstream payload is not JSON");
        Error::UpstreamPayload { service }
    })
}

fn classify(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    }
}

fn truncate(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc");
        // 'é' is two bytes; cutting inside it backs off to the boundary.
        assert_eq!(truncate("aé", 2), "a");
    }

    #[test]
    fn base_url_must_be_absolute() {
        assert!(parse_base_url("listing search", "https://example.com").is_ok());
        assert!(parse_base_url("listing search", "not a url").is_err());
        assert!(parse_base_url("listing search", "mailto:someone@example.com").is_err());
    }
}
