//! Core traits shared by the transport and the protocol engine.

use async_trait::async_trait;

use crate::jsonrpc::{ClientMessage, JsonRpcResponse};

/// Session identifier.
///
/// Opaque to clients; echoed back in the `sessionId` query parameter.
pub type SessionId = String;

/// Trait for protocol engines bound to a session.
///
/// The transport calls `handle` once per inbound message, in arrival order,
/// and writes any returned response onto the session's stream.
#[async_trait]
pub trait ProtocolEngine: Send + Sync {
    /// Process one client message.
    ///
    /// Returns `None` for messages that are not answered (notifications,
    /// client responses).
    async fn handle(&self, message: ClientMessage) -> Option<JsonRpcResponse>;
}
