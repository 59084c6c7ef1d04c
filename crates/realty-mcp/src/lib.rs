pub mod bridge;
pub mod jsonrpc;
pub mod tools;

pub use bridge::{BridgeConfig, BridgeError, StdioBridge, ToolInvoker};
pub use jsonrpc::{JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
pub use tools::{ToolDescriptor, ToolRegistry};
