use std::time::Duration;

use serde_json::Value;

use realty_mcp::{BridgeConfig, StdioBridge, ToolInvoker};

/// What to ask the bridged tool process.
pub enum BridgeAction {
    /// Call one tool with JSON arguments.
    Invoke { tool: String, arguments: Value },
    /// Ask the process for its tool list.
    List,
}

/// Spawn a stdio tool process, run one action against it, and shut it down.
pub async fn run(
    program: String,
    args: Vec<String>,
    timeout: Duration,
    handshake: bool,
    action: BridgeAction,
) -> anyhow::Result<Value> {
    let mut config = BridgeConfig::new(program, args).with_timeout(timeout);
    if handshake {
        config = config.with_initialize();
    }
    let bridge = StdioBridge::connect(&config).await?;

    let outcome = match action {
        BridgeAction::Invoke { tool, arguments } => bridge.invoke(&tool, arguments).await,
        BridgeAction::List => bridge.list_tools().await,
    };

    if let Err(e) = bridge.shutdown().await {
        tracing::warn!("Failed to shut down tool process: {e}");
    }

    Ok(outcome?)
}

/// Parse `--args` as a JSON object; an absent value means no arguments.
pub fn parse_arguments(raw: Option<&str>) -> anyhow::Result<Value> {
    let Some(raw) = raw else {
        return Ok(Value::Object(serde_json::Map::new()));
    };
    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        anyhow::bail!("tool arguments must be a JSON object");
    }
    Ok(value)
}
