//! Two-leg channel coordination.
//!
//! A session goes `OPENING → OPEN → CLOSED`. `open` performs the first
//! transition: it registers the session, starts its worker and emits the
//! `endpoint` event. The session closes when its stream is dropped (client
//! gone) or when `shutdown` drains the registry; either way the id is
//! deregistered and later posts for it get `UnknownSession`.

use std::sync::Arc;

use prompt_mcp_core::{
    ClientMessage, Outbound, OutboundStream, ProtocolEngine, ServerEvent, SessionId, outbound,
};
use prompt_mcp_session::{SessionError, SessionHandle, SessionRegistry};
use tokio::sync::mpsc;

use crate::error::GatewayError;

/// Default bound of each session's inbound and outbound queues.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// A freshly opened session.
#[derive(Debug)]
pub struct OpenSession {
    pub id: SessionId,
    pub stream: OutboundStream,
}

/// Binds streams to sessions and routes posted messages.
pub struct ChannelCoordinator {
    registry: Arc<SessionRegistry>,
    engine: Arc<dyn ProtocolEngine>,
    endpoint: String,
    queue_capacity: usize,
}

impl ChannelCoordinator {
    /// Create a coordinator whose sessions post to `endpoint`.
    #[must_use]
    pub fn new(engine: Arc<dyn ProtocolEngine>, endpoint: impl Into<String>) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            engine,
            endpoint: endpoint.into(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Bound each session's queues to `capacity` messages (minimum 1).
    ///
    /// Posts beyond the inbound bound are refused with `SessionBusy`; a
    /// client that stops reading its stream stalls its own worker.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// The live-session registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Open a new session.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn open(&self) -> OpenSession {
        let (outbound, stream) = outbound::channel(self.queue_capacity);
        let (inbound_tx, inbound_rx) = mpsc::channel(self.queue_capacity);

        let id = self.registry.create(SessionHandle::new(inbound_tx));
        // Fresh queue, so the endpoint event always fits.
        outbound.try_send(ServerEvent::Endpoint(format!(
            "{}?sessionId={id}",
            self.endpoint
        )));

        tokio::spawn(run_session(
            id.clone(),
            Arc::clone(&self.engine),
            inbound_rx,
            outbound,
        ));

        let registry = Arc::clone(&self.registry);
        let closed_id = id.clone();
        let stream = stream.on_close(move || {
            if registry.remove(&closed_id) {
                tracing::info!(session_id = %closed_id, "Stream closed");
            }
        });

        tracing::info!(session_id = %id, "Stream opened");
        OpenSession { id, stream }
    }

    /// Forward a posted body to its session.
    ///
    /// Returns as soon as the message is queued; the reply is delivered on
    /// the session's stream.
    ///
    /// # Errors
    /// `UnknownSession` if the id is not live, `BadRequest` if the body is
    /// not a JSON-RPC message, `SessionBusy` if the session's queue is full.
    pub fn route(&self, session_id: &str, body: &[u8]) -> Result<(), GatewayError> {
        let handle = self
            .registry
            .get(session_id)
            .ok_or_else(|| GatewayError::UnknownSession(session_id.to_string()))?;

        let message = ClientMessage::from_slice(body)
            .map_err(|e| GatewayError::BadRequest(format!("Invalid message: {e}")))?;

        tracing::debug!(session_id, method = ?message.method(), "Forwarding message");
        handle.forward(session_id, message).map_err(|e| match e {
            SessionError::Closed(id) => GatewayError::UnknownSession(id),
            SessionError::Busy(id) => {
                tracing::warn!(session_id = %id, "Session queue full, rejecting message");
                GatewayError::SessionBusy(id)
            }
        })
    }

    /// Close every session. Their streams end once pending replies drain.
    pub fn shutdown(&self) -> usize {
        let closed = self.registry.close_all();
        tracing::info!(closed, "Closed all sessions");
        closed
    }
}

/// Per-session worker: handles messages strictly in arrival order.
async fn run_session(
    id: SessionId,
    engine: Arc<dyn ProtocolEngine>,
    mut inbound: mpsc::Receiver<ClientMessage>,
    outbound: Outbound,
) {
    while let Some(message) = inbound.recv().await {
        let Some(response) = engine.handle(message).await else {
            continue;
        };
        let response_id = response.id.clone();
        if !outbound.send(ServerEvent::Message(response)).await {
            // Client went away while the reply was being produced.
            tracing::debug!(session_id = %id, %response_id, "Stream closed, dropping response");
        }
    }
    tracing::debug!(session_id = %id, "Session worker stopped");
}
