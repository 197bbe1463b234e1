//! MCP request handling for a prompts-only server.

use std::sync::Arc;

use async_trait::async_trait;
use prompt_mcp_core::{
    ClientMessage, JsonRpcError, JsonRpcResponse, ProtocolEngine,
    jsonrpc::{INTERNAL_ERROR, JsonRpcRequest},
};
use prompt_mcp_prompts::{InvocationArgs, PromptError, PromptRegistry};
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Server name reported by `initialize`.
pub const SERVER_NAME: &str = "prompt-mcp";

/// Protocol revisions this server speaks, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    #[serde(default)]
    protocol_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetPromptParams {
    name: String,
    #[serde(default)]
    arguments: Option<Map<String, Value>>,
}

/// Prompt failures are invalid-params errors; argument errors name the
/// offending argument in `data.argument`.
fn prompt_error(e: &PromptError) -> JsonRpcError {
    let error = JsonRpcError::invalid_params(e.to_string());
    match e.argument() {
        Some(name) => error.with_data(json!({ "argument": name })),
        None => error,
    }
}

/// JSON-RPC engine exposing a `PromptRegistry`.
pub struct McpEngine {
    prompts: Arc<PromptRegistry>,
    server_version: String,
}

impl McpEngine {
    #[must_use]
    pub fn new(prompts: Arc<PromptRegistry>) -> Self {
        Self {
            prompts,
            server_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn dispatch(&self, request: JsonRpcRequest) -> Result<Value, JsonRpcError> {
        match request.method.as_str() {
            "initialize" => Ok(self.initialize(request.params)),
            "ping" => Ok(json!({})),
            "prompts/list" => Ok(json!({ "prompts": self.prompts.list() })),
            "prompts/get" => self.get_prompt(request.params),
            other => Err(JsonRpcError::method_not_found(other)),
        }
    }

    fn initialize(&self, params: Option<Value>) -> Value {
        let requested = params
            .and_then(|p| serde_json::from_value::<InitializeParams>(p).ok())
            .and_then(|p| p.protocol_version);
        let version = requested
            .as_deref()
            .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
            .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0]);

        json!({
            "protocolVersion": version,
            "capabilities": { "prompts": { "listChanged": false } },
            "serverInfo": { "name": SERVER_NAME, "version": self.server_version },
        })
    }

    fn get_prompt(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
        let params: GetPromptParams = serde_json::from_value(params)
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {e}")))?;

        let args = match &params.arguments {
            Some(map) => InvocationArgs::from_json(map).map_err(|e| prompt_error(&e))?,
            None => InvocationArgs::new(),
        };
        let messages = self
            .prompts
            .get(&params.name, &args)
            .map_err(|e| prompt_error(&e))?;
        let description = self
            .prompts
            .find(&params.name)
            .map(|t| t.definition().description);

        serde_json::to_value(&messages)
            .map(|messages| json!({ "description": description, "messages": messages }))
            .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, e.to_string()))
    }
}

#[async_trait]
impl ProtocolEngine for McpEngine {
    async fn handle(&self, message: ClientMessage) -> Option<JsonRpcResponse> {
        match message {
            ClientMessage::Request(request) => {
                let id = request.id.clone();
                let method = request.method.clone();
                Some(match self.dispatch(request) {
                    Ok(result) => JsonRpcResponse::success(id, result),
                    Err(error) => {
                        tracing::debug!(%id, %method, code = error.code, "Request failed: {}", error.message);
                        JsonRpcResponse::failure(id, error)
                    }
                })
            }
            ClientMessage::Notification(notification) => {
                tracing::debug!(method = %notification.method, "Notification received");
                None
            }
            ClientMessage::Response(response) => {
                tracing::debug!(id = %response.id, "Ignoring client response");
                None
            }
        }
    }
}
