//! Stdio subprocess bridge.
//!
//! Spawns a long-lived tool process and speaks newline-delimited JSON-RPC
//! over its stdin/stdout. Responses are matched to requests by id, so any
//! number of calls may be in flight at once.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::{oneshot, Mutex};
use tokio_stream::wrappers::SplitStream;
use tokio_stream::StreamExt;

use crate::jsonrpc::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// MCP protocol revision offered during the initialize handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// How long `shutdown` waits for the process to exit after closing stdin.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Errors surfaced by the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bridge I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("tool process closed")]
    Closed,

    #[error("malformed response from tool process: {0}")]
    MalformedResponse(String),

    #[error("tool error {code}: {message}")]
    Remote { code: i32, message: String },
}

/// Method-call interface over an external tool.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Call tool `name` with `arguments` and return its result.
    async fn invoke(&self, name: &str, arguments: Value) -> Result<Value, BridgeError>;
}

/// Command line and call timeout for a bridged tool process.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
    /// Perform the MCP `initialize` handshake in [`StdioBridge::connect`].
    pub initialize: bool,
}

impl BridgeConfig {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: DEFAULT_CALL_TIMEOUT,
            initialize: false,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send `initialize` and `notifications/initialized` before any tool call.
    #[must_use]
    pub fn with_initialize(mut self) -> Self {
        self.initialize = true;
        self
    }
}

type PendingMap = HashMap<u64, oneshot::Sender<Result<Value, BridgeError>>>;

/// Never held across an await, so a blocking mutex is enough.
type Pending = Arc<std::sync::Mutex<PendingMap>>;

fn lock(pending: &Pending) -> MutexGuard<'_, PendingMap> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes a call's pending entry when the call ends, however it ends.
struct PendingGuard {
    pending: Pending,
    id: u64,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        lock(&self.pending).remove(&self.id);
    }
}

/// A running tool process and the calls awaiting its responses.
pub struct StdioBridge {
    child: Mutex<Child>,
    stdin: Mutex<Option<ChildStdin>>,
    next_id: AtomicU64,
    pending: Pending,
    closed: Arc<AtomicBool>,
    timeout: Duration,
}

impl StdioBridge {
    /// Spawn the tool process and start the stdout and stderr reader tasks.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Spawn`] if the process cannot be started.
    pub fn start(config: &BridgeConfig) -> Result<Self, BridgeError> {
        tracing::info!(program = %config.program, args = ?config.args, "spawning tool process");

        let mut child = Command::new(&config.program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BridgeError::Spawn {
                program: config.program.clone(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| not_captured("stdin"))?;
        let stdout = child.stdout.take().ok_or_else(|| not_captured("stdout"))?;
        let stderr = child.stderr.take().ok_or_else(|| not_captured("stderr"))?;

        let pending: Pending = Arc::new(std::sync::Mutex::new(HashMap::new()));
        let closed = Arc::new(AtomicBool::new(false));

        tokio::spawn(drain_stderr(stderr, config.program.clone()));
        tokio::spawn(read_responses(stdout, pending.clone(), closed.clone()));

        Ok(Self {
            child: Mutex::new(child),
            stdin: Mutex::new(Some(stdin)),
            next_id: AtomicU64::new(1),
            pending,
            closed,
            timeout: config.timeout,
        })
    }

    /// Spawn the tool process and, if configured, complete the MCP handshake.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Spawn`] if the process cannot be started, or
    /// any call error raised by the `initialize` request.
    pub async fn connect(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let bridge = Self::start(config)?;
        if config.initialize {
            bridge.initialize().await?;
        }
        Ok(bridge)
    }

    async fn initialize(&self) -> Result<(), BridgeError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": "realty",
                "version": env!("CARGO_PKG_VERSION"),
            },
        });
        let result = self.call("initialize", params).await?;
        tracing::info!(
            server = %result["serverInfo"]["name"],
            protocol = %result["protocolVersion"],
            "tool process initialized"
        );

        let mut line = serde_json::to_string(&JsonRpcNotification::new("notifications/initialized"))?;
        line.push('\n');
        self.write_line(&line).await
    }

    /// Send a JSON-RPC request and wait for the response with the same id.
    ///
    /// # Errors
    ///
    /// Fails on write errors, timeout, process exit, an unparseable reply,
    /// or an `error` object in the response.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, BridgeError> {
        self.request(|id| JsonRpcRequest::new(id, method, params))
            .await
    }

    async fn request(
        &self,
        build: impl FnOnce(u64) -> JsonRpcRequest + Send,
    ) -> Result<Value, BridgeError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = build(id);
        let mut line = serde_json::to_string(&request)?;
        line.push('\n');

        let (tx, rx) = oneshot::channel();
        lock(&self.pending).insert(id, tx);
        // Dropping the future (an outer timeout, a cancelled select) also clears the entry.
        let _guard = PendingGuard {
            pending: self.pending.clone(),
            id,
        };

        if self.closed.load(Ordering::Acquire) {
            return Err(BridgeError::Closed);
        }

        self.write_line(&line).await?;
        tracing::debug!(id, method = %request.method, "sent request to tool process");

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(BridgeError::Closed),
            Err(_) => {
                tracing::warn!(id, method = %request.method, "tool call timed out");
                Err(BridgeError::Timeout(self.timeout))
            }
        }
    }

    /// Ask the tool process for its own tool list.
    ///
    /// # Errors
    ///
    /// Same as [`StdioBridge::call`].
    pub async fn list_tools(&self) -> Result<Value, BridgeError> {
        self.call("tools/list", Value::Object(serde_json::Map::new()))
            .await
    }

    /// Number of calls still waiting for a response.
    pub fn in_flight(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Close stdin and wait briefly for the process to exit, killing it otherwise.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if waiting on or killing the process fails.
    pub async fn shutdown(&self) -> Result<(), BridgeError> {
        drop(self.stdin.lock().await.take());

        let mut child = self.child.lock().await;
        let exited = tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await;
        if let Ok(status) = exited {
            let status = status?;
            tracing::info!(%status, "tool process exited");
        } else {
            tracing::warn!("tool process did not exit after stdin closed, killing");
            child.kill().await?;
        }
        Ok(())
    }

    async fn write_line(&self, line: &str) -> Result<(), BridgeError> {
        let mut guard = self.stdin.lock().await;
        let stdin = guard.as_mut().ok_or(BridgeError::Closed)?;
        stdin.write_all(line.as_bytes()).await?;
        stdin.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl ToolInvoker for StdioBridge {
    async fn invoke(&self, name: &str, arguments: Value) -> Result<Value, BridgeError> {
        self.request(|id| JsonRpcRequest::tool_call(id, name, arguments))
            .await
    }
}

fn not_captured(stream: &str) -> BridgeError {
    BridgeError::Io(std::io::Error::other(format!(
        "tool process {stream} was not captured"
    )))
}

/// Log every stderr line until EOF. Bytes that are not UTF-8 are replaced, never fatal.
async fn drain_stderr(stderr: ChildStderr, program: String) {
    let mut lines = SplitStream::new(BufReader::new(stderr).split(b'\n'));
    while let Some(line) = lines.next().await {
        match line {
            Ok(line) => {
                let line = String::from_utf8_lossy(&line);
                tracing::warn!(program = %program, "{}", line.trim_end());
            }
            Err(e) => {
                tracing::warn!(program = %program, error = %e, "failed to read tool process stderr");
                break;
            }
        }
    }
}

async fn read_responses(stdout: ChildStdout, pending: Pending, closed: Arc<AtomicBool>) {
    let mut frames = SplitStream::new(BufReader::new(stdout).split(b'\n'));
    while let Some(frame) = frames.next().await {
        match frame {
            Ok(frame) => match std::str::from_utf8(&frame) {
                Ok(line) => dispatch(line, &pending),
                Err(e) => reject_sole_pending(
                    &pending,
                    &String::from_utf8_lossy(&frame),
                    &format!("output is not UTF-8: {e}"),
                ),
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to read tool process stdout");
                break;
            }
        }
    }

    tracing::info!("tool process stdout closed");
    closed.store(true, Ordering::Release);
    for (_, tx) in lock(&pending).drain() {
        let _ = tx.send(Err(BridgeError::Closed));
    }
}

/// Route one output line to the call it answers.
fn dispatch(line: &str, pending: &Pending) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => return reject_sole_pending(pending, line, &e.to_string()),
    };

    // Notifications and server-initiated requests carry a method and no outcome.
    if value.get("method").is_some() && value.get("result").is_none() && value.get("error").is_none()
    {
        tracing::debug!(method = %value["method"], "ignoring message from tool process");
        return;
    }

    let response: JsonRpcResponse = match serde_json::from_value(value) {
        Ok(response) => response,
        Err(e) => return reject_sole_pending(pending, line, &e.to_string()),
    };

    let Some(id) = response.numeric_id() else {
        tracing::warn!(id = %response.id, "dropping response without a numeric id");
        return;
    };

    let Some(tx) = lock(pending).remove(&id) else {
        tracing::warn!(id, "dropping response for unknown or expired call");
        return;
    };

    let outcome = match response.error {
        Some(err) => Err(BridgeError::Remote {
            code: err.code,
            message: err.message,
        }),
        None => Ok(response.result.unwrap_or(Value::Null)),
    };
    let _ = tx.send(outcome);
}

/// An unparseable line can only be attributed when exactly one call is waiting.
fn reject_sole_pending(pending: &Pending, line: &str, reason: &str) {
    let mut pending = lock(pending);
    let ids: Vec<u64> = pending.keys().copied().collect();
    if let [id] = ids.as_slice() {
        if let Some(tx) = pending.remove(id) {
            let _ = tx.send(Err(BridgeError::MalformedResponse(reason.to_string())));
        }
    } else {
        tracing::warn!(line, reason, "dropping unparseable line from tool process");
    }
}
