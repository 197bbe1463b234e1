//! Transport layer for the prompt MCP server.
//!
//! Provides:
//! - `AuthGate` - bearer-token allow-list guarding the `/mcp` routes
//! - `ChannelCoordinator` - binds SSE streams to sessions and routes posts
//! - `McpEngine` - JSON-RPC handler serving the prompt registry
//! - `create_mcp_router` - axum router wiring it all together

pub mod auth;
pub mod coordinator;
pub mod error;
pub mod mcp;
pub mod router;

pub use auth::AuthGate;
pub use coordinator::{ChannelCoordinator, DEFAULT_QUEUE_CAPACITY, OpenSession};
pub use error::GatewayError;
pub use mcp::McpEngine;
pub use router::{MCP_PATH, create_mcp_router};
