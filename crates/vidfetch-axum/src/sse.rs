//! Registry of open progress streams.
//!
//! Every `GET /progress` connection owns one bounded channel registered here.
//! Broadcasting serialises the event once and offers the frame to each channel
//! without waiting, so a slow or vanished subscriber never stalls a download.
//!
//! Each channel keeps one slot that progress frames may not use. A stalled
//! viewer loses intermediate percentages but still gets the completion frame.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};
use vidfetch_core::{ProgressEmitter, ProgressEvent};

/// Progress frames buffered per connection before new ones are dropped for it.
pub const DEFAULT_BUFFER: usize = 64;

/// Slots per connection that only completion frames may fill.
const TERMINAL_RESERVE: usize = 1;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Identifier handed out by [`ConnectionRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A registered connection: its id and the receiving half of its channel.
#[derive(Debug)]
pub struct Subscription {
    pub id: ConnectionId,
    pub receiver: mpsc::Receiver<Arc<str>>,
}

/// Set of open progress connections.
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, mpsc::Sender<Arc<str>>>>,
    next_id: AtomicU64,
    buffer: usize,
}

impl ConnectionRegistry {
    /// Create an empty registry with `buffer` progress frames of slack per connection.
    #[must_use]
    pub fn new(buffer: usize) -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            buffer: buffer.max(1),
        }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BUFFER)
    }

    fn connections(&self) -> MutexGuard<'_, HashMap<ConnectionId, mpsc::Sender<Arc<str>>>> {
        // The map stays consistent even if a holder panicked mid-operation
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new connection.
    pub fn subscribe(&self) -> Subscription {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(self.buffer + TERMINAL_RESERVE);
        let count = {
            let mut connections = self.connections();
            connections.insert(id, sender);
            connections.len()
        };
        debug!(target: "vidfetch.sse", %id, subscribers = count, "Progress subscriber connected");
        Subscription { id, receiver }
    }

    /// Remove a connection. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ConnectionId) -> bool {
        let (removed, count) = {
            let mut connections = self.connections();
            let removed = connections.remove(&id).is_some();
            (removed, connections.len())
        };
        if removed {
            debug!(target: "vidfetch.sse", %id, subscribers = count, "Progress subscriber disconnected");
        }
        removed
    }

    /// Send `event` to every registered connection.
    ///
    /// Per-connection failures are logged and skipped. A closed channel stays
    /// registered until its stream is dropped and unsubscribes itself.
    /// Progress frames are dropped for a connection once only the reserved
    /// slot is left; completion frames may take it.
    pub fn broadcast(&self, event: &ProgressEvent) {
        let terminal = event.is_terminal();
        let frame: Arc<str> = match event.to_json() {
            Ok(json) => Arc::from(json),
            Err(e) => {
                warn!(target: "vidfetch.sse", error = %e, "Failed to serialize progress event");
                return;
            }
        };

        let connections = self.connections();
        for (id, sender) in connections.iter() {
            if !terminal && !sender.is_closed() && sender.capacity() <= TERMINAL_RESERVE {
                debug!(target: "vidfetch.sse", %id, "Subscriber lagging, dropping progress frame");
                continue;
            }
            match sender.try_send(Arc::clone(&frame)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(target: "vidfetch.sse", %id, "Subscriber buffer full, dropping frame");
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(target: "vidfetch.sse", %id, "Subscriber channel closed, skipping");
                }
            }
        }
    }

    /// Number of registered connections.
    pub fn subscriber_count(&self) -> usize {
        self.connections().len()
    }

    /// Register a connection and wrap it in an SSE response.
    ///
    /// The connection is unsubscribed when axum drops the stream, which
    /// happens as soon as the client goes away.
    pub fn sse_response(
        self: Arc<Self>,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
        let Subscription { id, receiver } = self.subscribe();
        let guard = Unsubscribe {
            registry: self,
            id,
        };

        // The closure owns the guard, so the connection lives exactly as long as the stream
        let stream = ReceiverStream::new(receiver).map(move |frame| {
            let _held = &guard;
            Ok(Event::default().data(&*frame))
        });

        Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ProgressEmitter for ConnectionRegistry {
    fn emit(&self, event: ProgressEvent) {
        self.broadcast(&event);
    }
}

/// Unsubscribes its connection when dropped.
struct Unsubscribe {
    registry: Arc<ConnectionRegistry>,
    id: ConnectionId,
}

impl Drop for Unsubscribe {
    fn drop(&mut self) {
        self.registry.unsubscribe(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_registry_starts_empty() {
        let registry = ConnectionRegistry::with_defaults();
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[test]
    fn test_broadcast_without_subscribers() {
        let registry = ConnectionRegistry::with_defaults();
        // Should not panic with nobody listening
        registry.broadcast(&ProgressEvent::progress(10));
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = ConnectionRegistry::with_defaults();
        let a = registry.subscribe();
        let b = registry.subscribe();
        assert_ne!(a.id, b.id);
        assert_eq!(registry.subscriber_count(), 2);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let registry = ConnectionRegistry::with_defaults();
        let sub = registry.subscribe();

        assert!(registry.unsubscribe(sub.id));
        assert!(!registry.unsubscribe(sub.id));
        assert!(!registry.unsubscribe(ConnectionId(999)));
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_frame_verbatim() {
        let registry = ConnectionRegistry::with_defaults();
        let mut a = registry.subscribe();
        let mut b = registry.subscribe();

        registry.broadcast(&ProgressEvent::progress(42));
        registry.broadcast(&ProgressEvent::done(true));

        for sub in [&mut a, &mut b] {
            assert_eq!(&*sub.receiver.recv().await.unwrap(), r#"{"progress":42}"#);
            assert_eq!(
                &*sub.receiver.recv().await.unwrap(),
                r#"{"done":true,"success":true}"#
            );
        }
    }

    #[tokio::test]
    async fn test_unsubscribed_connection_misses_later_frames() {
        let registry = ConnectionRegistry::with_defaults();
        let mut gone = registry.subscribe();
        let mut stays = registry.subscribe();

        registry.unsubscribe(gone.id);
        registry.broadcast(&ProgressEvent::progress(5));

        assert_eq!(&*stays.receiver.recv().await.unwrap(), r#"{"progress":5}"#);
        assert!(gone.receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_dead_and_full_subscribers_do_not_block_others() {
        let registry = ConnectionRegistry::new(1);
        let dead = registry.subscribe();
        drop(dead.receiver);
        let _full = registry.subscribe();
        let mut live = registry.subscribe();

        registry.broadcast(&ProgressEvent::progress(1));
        assert_eq!(&*live.receiver.recv().await.unwrap(), r#"{"progress":1}"#);

        // `_full` still holds the first frame; this one is dropped for it only
        registry.broadcast(&ProgressEvent::progress(2));
        assert_eq!(&*live.receiver.recv().await.unwrap(), r#"{"progress":2}"#);

        // Closed channels stay registered until their stream goes away
        assert_eq!(registry.subscriber_count(), 3);
    }

    #[test]
    fn test_stalled_subscriber_still_gets_completion() {
        let registry = ConnectionRegistry::new(DEFAULT_BUFFER);
        let mut stalled = registry.subscribe();

        for percent in 0..100 {
            registry.broadcast(&ProgressEvent::progress(percent));
        }
        registry.broadcast(&ProgressEvent::done(true));

        let mut frames = Vec::new();
        while let Ok(frame) = stalled.receiver.try_recv() {
            frames.push(frame);
        }

        assert_eq!(frames.len(), DEFAULT_BUFFER + 1);
        assert_eq!(&*frames[0], r#"{"progress":0}"#);
        assert_eq!(&*frames[DEFAULT_BUFFER - 1], r#"{"progress":63}"#);
        assert_eq!(&*frames[DEFAULT_BUFFER], r#"{"done":true,"success":true}"#);
    }

    #[tokio::test]
    async fn test_emitter_port_broadcasts() {
        let registry = ConnectionRegistry::with_defaults();
        let mut sub = registry.subscribe();
        let emitter: &dyn ProgressEmitter = &registry;

        emitter.emit(ProgressEvent::done(false));

        assert_eq!(
            &*sub.receiver.recv().await.unwrap(),
            r#"{"done":true,"success":false}"#
        );
    }

    #[tokio::test]
    async fn test_dropping_sse_response_unsubscribes() {
        let registry = Arc::new(ConnectionRegistry::with_defaults());
        let response = Arc::clone(&registry).sse_response().into_response();
        assert_eq!(registry.subscriber_count(), 1);

        drop(response);
        assert_eq!(registry.subscriber_count(), 0);
    }
}
