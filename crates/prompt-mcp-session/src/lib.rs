//! Session registry for the prompt MCP server.
//!
//! Provides:
//! - `SessionRegistry` - live sessions keyed by id
//! - `SessionHandle` - inbound queue of one session

pub mod registry;

pub use registry::{SessionError, SessionHandle, SessionRegistry};
