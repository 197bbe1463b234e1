//! Core abstractions for the prompt MCP server.
//!
//! This crate provides the fundamental building blocks:
//! - `jsonrpc` - JSON-RPC 2.0 envelope types
//! - `Outbound` / `OutboundStream` - per-session push channel
//! - `ProtocolEngine` - trait implemented by the message handler

pub mod jsonrpc;
pub mod outbound;
pub mod traits;

pub use jsonrpc::{ClientMessage, JsonRpcError, JsonRpcResponse, RequestId};
pub use outbound::{Outbound, OutboundStream, ServerEvent};
pub use traits::{ProtocolEngine, SessionId};
