use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

/// Thin HTTP client for a running gateway.
pub struct Gateway {
    client: Client,
    base_url: String,
}

impl Gateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET a path and return the JSON body.
    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        send(self.client.get(format!("{}{path}", self.base_url))).await
    }

    /// POST a JSON body to a tool endpoint and return the JSON envelope.
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> anyhow::Result<Value> {
        send(self.client.post(format!("{}{path}", self.base_url)).json(body)).await
    }
}

async fn send(request: RequestBuilder) -> anyhow::Result<Value> {
    let resp = request.send().await?;
    let status = resp.status();
    let body: Value = resp.json().await?;

    if !status.is_success() {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("no error message");
        anyhow::bail!("gateway returned {status}: {message}");
    }

    tracing::debug!(%status, "gateway call complete");
    Ok(body)
}

/// Print a JSON value the way every subcommand reports results.
pub fn print(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
