//! A thread-safe registry of live WebSocket connections with best-effort broadcast.
//!
//! Each connected dashboard client is registered as a bounded outbound queue;
//! a writer task on the socket side drains the queue, so delivery to one
//! client never blocks on another. Broadcasting pushes a frame into every
//! queue with `try_send` and drops connections whose queue is closed or full.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, mpsc};

/// Process-unique identifier for a registered connection.
pub type ConnectionId = u64;

/// Frames a connection can buffer before it is considered stalled and dropped.
const OUTBOUND_CAPACITY: usize = 64;

/// Tracks the set of live client connections and fans events out to them.
///
/// - `register` creates the per-connection queue and hands the receiving end
///   back to the socket's writer task
/// - `unregister` is idempotent; unknown ids are a no-op
/// - `broadcast` never fails and never blocks on a peer
#[derive(Clone, Default)]
pub struct WebSocketManager {
    /// Map of connection ids to their outbound queues.
    inner: Arc<RwLock<HashMap<ConnectionId, mpsc::Sender<String>>>>,
    next_id: Arc<AtomicU64>,
}

impl WebSocketManager {
    /// Creates a new, empty `WebSocketManager`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection and returns its id together with the
    /// receiving end of its outbound queue.
    pub async fn register(&self) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
        self.inner.write().await.insert(id, tx);
        tracing::debug!(connection = id, "WS connection registered");
        (id, rx)
    }

    /// Removes a connection from the registry.
    ///
    /// Idempotent: removing an unknown or already-removed id is a no-op.
    pub async fn unregister(&self, id: ConnectionId) {
        if self.inner.write().await.remove(&id).is_some() {
            tracing::debug!(connection = id, "WS connection unregistered");
        }
    }

    /// Returns the current `(id, sender)` pairs without mutating the set.
    ///
    /// The snapshot is detached from the live map, so callers may iterate it
    /// while connections register and unregister concurrently.
    pub async fn snapshot(&self) -> Vec<(ConnectionId, mpsc::Sender<String>)> {
        self.inner
            .read()
            .await
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect()
    }

    /// Returns the number of currently registered connections.
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Delivers `msg` to every registered connection, best-effort.
    ///
    /// A connection whose queue is closed (client went away) or full (client
    /// stalled) is unregistered; delivery to the remaining connections
    /// continues. Frames pushed into a single queue retain the order
    /// broadcasts were issued in.
    pub async fn broadcast<T: Into<String>>(&self, msg: T) {
        let msg = msg.into();
        let targets = self.snapshot().await;

        let mut dead = Vec::new();
        for (id, tx) in targets {
            if let Err(e) = tx.try_send(msg.clone()) {
                tracing::info!(connection = id, error = %e, "Dropping unreachable WS connection");
                dead.push(id);
            }
        }

        if !dead.is_empty() {
            let mut map = self.inner.write().await;
            for id in dead {
                map.remove(&id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, timeout};

    #[tokio::test]
    async fn it_broadcasts_to_all_connections() {
        let manager = WebSocketManager::new();

        let (_, mut r1) = manager.register().await;
        let (_, mut r2) = manager.register().await;

        manager.broadcast("hello world").await;

        let msg1 = timeout(Duration::from_millis(50), r1.recv())
            .await
            .unwrap()
            .unwrap();
        let msg2 = timeout(Duration::from_millis(50), r2.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(msg1, "hello world");
        assert_eq!(msg2, "hello world");
    }

    #[tokio::test]
    async fn unregister_is_idempotent() {
        let manager = WebSocketManager::new();
        let (id, _rx) = manager.register().await;

        manager.unregister(id).await;
        manager.unregister(id).await;
        manager.unregister(9999).await;

        assert_eq!(manager.connection_count().await, 0);
    }

    #[tokio::test]
    async fn broadcast_with_no_connections_does_not_panic() {
        let manager = WebSocketManager::new();
        manager.broadcast("silent").await;
    }

    #[tokio::test]
    async fn dead_connection_is_removed_on_broadcast() {
        let manager = WebSocketManager::new();
        let (_, rx) = manager.register().await;
        let (_, mut live_rx) = manager.register().await;
        drop(rx);

        manager.broadcast("cleanup").await;

        // The dead peer is gone, the live one still got the frame.
        assert_eq!(manager.connection_count().await, 1);
        let msg = timeout(Duration::from_millis(50), live_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(msg, "cleanup");
    }

    #[tokio::test]
    async fn stalled_connection_is_removed_once_its_queue_fills() {
        let manager = WebSocketManager::new();
        let (_, _rx) = manager.register().await;

        // Never drain the queue; one past capacity must evict the peer.
        for i in 0..=OUTBOUND_CAPACITY {
            manager.broadcast(format!("frame-{i}")).await;
        }

        assert_eq!(manager.connection_count().await, 0);
    }

    #[tokio::test]
    async fn frames_arrive_in_broadcast_order() {
        let manager = WebSocketManager::new();
        let (_, mut rx) = manager.register().await;

        manager.broadcast("first").await;
        manager.broadcast("second").await;
        manager.broadcast("third").await;

        for expected in ["first", "second", "third"] {
            let msg = timeout(Duration::from_millis(50), rx.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(msg, expected);
        }
    }

    #[tokio::test]
    async fn concurrent_connects_disconnects_and_broadcasts_complete() {
        let manager = WebSocketManager::new();
        let mut tasks = Vec::new();

        for _ in 0..8 {
            let m = manager.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..50 {
                    let (id, rx) = m.register().await;
                    m.broadcast("tick").await;
                    drop(rx);
                    m.unregister(id).await;
                }
            }));
        }
        for _ in 0..4 {
            let m = manager.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..100 {
                    m.broadcast("noise").await;
                }
            }));
        }

        for t in tasks {
            t.await.unwrap();
        }

        manager.broadcast("done").await;
        assert_eq!(manager.connection_count().await, 0);
    }
}
