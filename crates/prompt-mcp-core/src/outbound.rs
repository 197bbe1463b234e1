//! Per-session push channel.
//!
//! `Outbound` is the write half handed to whoever produces server events;
//! `OutboundStream` is the read half the transport turns into a response
//! body. The channel is bounded, so a client that stops reading holds its
//! producer back instead of growing the queue. Dropping the stream (client
//! gone) closes the channel and runs the registered close hook exactly once.

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use futures::Stream;
use tokio::sync::mpsc;

use crate::jsonrpc::JsonRpcResponse;

/// Event written to a session's stream.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// First event of every stream: where to post requests for this session.
    Endpoint(String),
    /// A JSON-RPC message for the client.
    Message(JsonRpcResponse),
}

impl ServerEvent {
    /// SSE event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Endpoint(_) => "endpoint",
            Self::Message(_) => "message",
        }
    }

    /// SSE data payload.
    #[must_use]
    pub fn data(&self) -> String {
        match self {
            Self::Endpoint(uri) => uri.clone(),
            Self::Message(msg) => match serde_json::to_string(msg) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {e}");
                    String::new()
                }
            },
        }
    }

    /// Convert to an axum SSE event (requires `sse` feature).
    #[cfg(feature = "sse")]
    #[must_use]
    pub fn to_sse_event(&self) -> axum::response::sse::Event {
        axum::response::sse::Event::default()
            .event(self.name())
            .data(self.data())
    }
}

/// Create a connected outbound pair holding at most `capacity` queued events.
///
/// # Panics
/// Panics if `capacity` is zero.
#[must_use]
pub fn channel(capacity: usize) -> (Outbound, OutboundStream) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        Outbound { tx },
        OutboundStream {
            rx,
            on_close: None,
        },
    )
}

/// Write half of a session's stream.
#[derive(Debug, Clone)]
pub struct Outbound {
    tx: mpsc::Sender<ServerEvent>,
}

impl Outbound {
    /// Queue an event for the client, waiting while the queue is full.
    ///
    /// Returns `false` when the stream is already closed; the event is
    /// dropped in that case.
    pub async fn send(&self, event: ServerEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    /// Queue an event without waiting.
    ///
    /// Returns `false` when the stream is closed or the queue is full.
    pub fn try_send(&self, event: ServerEvent) -> bool {
        self.tx.try_send(event).is_ok()
    }

    /// Whether the read half has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

type CloseHook = Box<dyn FnOnce() + Send>;

/// Read half of a session's stream.
pub struct OutboundStream {
    rx: mpsc::Receiver<ServerEvent>,
    on_close: Option<CloseHook>,
}

impl OutboundStream {
    /// Register a hook that runs once when this stream is dropped.
    #[must_use]
    pub fn on_close(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    /// SSE stream (requires `sse` feature).
    #[cfg(feature = "sse")]
    pub fn into_sse_stream(
        self,
    ) -> impl Stream<Item = Result<axum::response::sse::Event, std::convert::Infallible>>
    + Send
    + 'static {
        use futures::StreamExt;
        self.map(|event| Ok(event.to_sse_event()))
    }
}

impl Stream for OutboundStream {
    type Item = ServerEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for OutboundStream {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(hook) = self.on_close.take() {
            hook();
        }
    }
}

impl std::fmt::Debug for OutboundStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboundStream")
            .field("has_close_hook", &self.on_close.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use futures::StreamExt;
    use serde_json::json;

    use super::*;
    use crate::jsonrpc::RequestId;

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (tx, mut rx) = channel(4);
        assert!(tx.try_send(ServerEvent::Endpoint("/mcp?sessionId=a".into())));
        assert!(
            tx.send(ServerEvent::Message(JsonRpcResponse::success(
                RequestId::Number(1),
                json!({}),
            )))
            .await
        );
        drop(tx);

        let first = rx.next().await.unwrap();
        assert_eq!(first.name(), "endpoint");
        assert_eq!(first.data(), "/mcp?sessionId=a");

        let second = rx.next().await.unwrap();
        assert_eq!(second.name(), "message");
        assert!(second.data().contains("\"id\":1"));

        assert!(rx.next().await.is_none());
    }

    #[tokio::test]
    async fn test_send_after_close_is_noop() {
        let (tx, rx) = channel(4);
        drop(rx);
        assert!(tx.is_closed());
        assert!(!tx.send(ServerEvent::Endpoint("/mcp".into())).await);
        assert!(!tx.try_send(ServerEvent::Endpoint("/mcp".into())));
    }

    #[tokio::test]
    async fn test_full_queue_holds_sender_until_read() {
        let (tx, mut rx) = channel(1);
        assert!(tx.try_send(ServerEvent::Endpoint("first".into())));
        assert!(!tx.try_send(ServerEvent::Endpoint("dropped".into())));

        let pending =
            tokio::spawn(async move { tx.send(ServerEvent::Endpoint("second".into())).await });
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        assert_eq!(rx.next().await.unwrap().data(), "first");
        assert!(pending.await.unwrap());
        assert_eq!(rx.next().await.unwrap().data(), "second");
    }

    #[test]
    fn test_close_hook_runs_once_on_drop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let (tx, rx) = channel(1);
        let rx = rx.on_close(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        drop(rx);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(tx.is_closed());
    }
}
