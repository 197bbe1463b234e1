//! In-memory registry of live sessions.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use prompt_mcp_core::{ClientMessage, SessionId};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Session error.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session closed: {0}")]
    Closed(SessionId),
    #[error("Session queue full: {0}")]
    Busy(SessionId),
}

/// Inbound queue of one open session.
///
/// Messages pushed here are consumed by the session's worker in order.
/// The queue is bounded and `forward` never waits. Dropping every handle
/// ends the worker.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inbound: mpsc::Sender<ClientMessage>,
}

impl SessionHandle {
    /// Wrap the sending side of a session's inbound queue.
    #[must_use]
    pub const fn new(inbound: mpsc::Sender<ClientMessage>) -> Self {
        Self { inbound }
    }

    /// Queue a message for the session's worker.
    ///
    /// # Errors
    /// Returns `Closed` if the worker has already stopped, `Busy` if the
    /// queue is full.
    pub fn forward(&self, id: &str, message: ClientMessage) -> Result<(), SessionError> {
        self.inbound.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SessionError::Busy(id.to_string()),
            mpsc::error::TrySendError::Closed(_) => SessionError::Closed(id.to_string()),
        })
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inbound.is_closed()
    }
}

/// Live sessions keyed by id.
///
/// Every operation takes the lock once, so lookups never observe a
/// half-inserted or half-removed entry.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle under a fresh id.
    pub fn create(&self, handle: SessionHandle) -> SessionId {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(id.clone(), handle);
        tracing::debug!(session_id = %id, live = sessions.len(), "Session registered");
        id
    }

    /// Look up a live session.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Deregister a session. Removing an absent id is a no-op.
    ///
    /// Returns whether an entry was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let removed = sessions.remove(id).is_some();
        if removed {
            tracing::debug!(session_id = %id, live = sessions.len(), "Session removed");
        }
        removed
    }

    /// Drop every session. Used at shutdown.
    ///
    /// Returns how many sessions were closed.
    pub fn close_all(&self) -> usize {
        let drained: Vec<_> = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .collect();
        drained.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
