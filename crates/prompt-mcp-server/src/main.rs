//! Essay prompt MCP server.
//!
//! Run with: cargo run -p prompt-mcp-server
//!
//! Clients open `GET /mcp` for the event stream and post JSON-RPC messages
//! to the `endpoint` it announces.

mod config;

use std::sync::Arc;

use anyhow::Context;
use prompt_mcp_prompts::{PromptAssets, PromptRegistry};
use prompt_mcp_transport::{
    AuthGate, ChannelCoordinator, MCP_PATH, McpEngine, create_mcp_router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    let assets = PromptAssets::load(&config.prompt_dir).context("failed to load prompt texts")?;

    let prompts = Arc::new(PromptRegistry::essays(assets));
    let engine = Arc::new(McpEngine::new(prompts));
    let coordinator = Arc::new(ChannelCoordinator::new(engine, MCP_PATH));

    let gate = AuthGate::new(&config.auth_tokens);
    if !gate.is_enabled() {
        tracing::warn!("MCP_AUTH_TOKENS is empty, authentication disabled");
    }

    let app = create_mcp_router(Arc::clone(&coordinator), gate).layer(TraceLayer::new_for_http());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("MCP prompt server listening on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(coordinator))
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM, after closing every session so the open
/// event streams end and graceful shutdown can finish.
async fn shutdown_signal(coordinator: Arc<ChannelCoordinator>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    coordinator.shutdown();
}
