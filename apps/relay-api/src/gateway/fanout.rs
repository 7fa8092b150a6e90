//! Broadcast hub: ingests producer frames and fans them out to every live
//! connection.
//!
//! Relay is best-effort and permissive: a frame that fails to decode still
//! reaches every peer byte-for-byte, it just never updates the cache.
//! Downstream viewers may rely on seeing the raw producer stream regardless
//! of schema validity.

use std::sync::Arc;

use axum::extract::ws::{Message, Utf8Bytes};

use super::cache::LatestFocus;
use super::registry::ConnectionRegistry;
use super::sample::Sample;

/// Receives inbound frames, updates the latest-sample cache, and pushes each
/// frame to all registered connections, pruning the ones that fail.
pub struct RelayHub {
    registry: Arc<ConnectionRegistry>,
    cache: Arc<LatestFocus>,
}

impl RelayHub {
    pub fn new(registry: Arc<ConnectionRegistry>, cache: Arc<LatestFocus>) -> Self {
        Self { registry, cache }
    }

    /// Process one inbound text frame from `from_id`.
    ///
    /// Every handle in the current registry snapshot gets exactly one
    /// delivery attempt before any pruning happens, so a connection is never
    /// removed ahead of its own attempt for this frame. The sender is not
    /// special-cased: if it is registered (it always is), it receives its own
    /// frames back.
    pub async fn ingest(&self, raw: Utf8Bytes, from_id: &str) {
        match Sample::decode(raw.as_str()) {
            Ok(sample) => self.cache.set(sample),
            Err(err) => {
                tracing::debug!(conn_id = %from_id, %err, "undecodable frame, relaying as-is");
            }
        }

        let mut dead = Vec::new();
        for handle in self.registry.snapshot() {
            if let Err(err) = handle.push(Message::Text(raw.clone())).await {
                tracing::debug!(conn_id = %handle.id, %err, "broadcast push failed");
                dead.push(handle.id);
            }
        }

        for id in dead {
            if self.registry.remove(&id) {
                tracing::info!(
                    conn_id = %id,
                    remaining = self.registry.len(),
                    "pruned unreachable connection"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::registry::ConnectionHandle;
    use tokio::sync::mpsc;

    fn hub() -> (RelayHub, Arc<ConnectionRegistry>, Arc<LatestFocus>) {
        let registry = Arc::new(ConnectionRegistry::new());
        let cache = Arc::new(LatestFocus::new());
        let hub = RelayHub::new(registry.clone(), cache.clone());
        (hub, registry, cache)
    }

    fn register(registry: &ConnectionRegistry, id: &str) -> mpsc::Receiver<Message> {
        let (tx, rx) = mpsc::channel(8);
        registry
            .add(ConnectionHandle::new(id.to_string(), tx))
            .unwrap();
        rx
    }

    fn recv_text(rx: &mut mpsc::Receiver<Message>) -> String {
        match rx.try_recv().expect("expected a queued frame") {
            Message::Text(t) => t.to_string(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ingest_updates_cache_and_fans_out() {
        let (hub, registry, cache) = hub();
        let mut rx_a = register(&registry, "conn_a");
        let mut rx_b = register(&registry, "conn_b");

        let frame = r#"{"score": 0.82, "ts": 1000.0}"#;
        hub.ingest(frame.into(), "conn_src").await;

        assert_eq!(cache.get(), Some(Sample::new(0.82, 1000.0)));
        assert_eq!(recv_text(&mut rx_a), frame);
        assert_eq!(recv_text(&mut rx_b), frame);
    }

    #[tokio::test]
    async fn ingest_clamps_out_of_range_scores() {
        let (hub, _registry, cache) = hub();

        hub.ingest(r#"{"score": 1.7, "ts": 1000.0}"#.into(), "conn_src").await;
        assert_eq!(cache.get().unwrap().score, 1.0);

        hub.ingest(r#"{"score": -0.3, "ts": 1001.0}"#.into(), "conn_src").await;
        assert_eq!(cache.get().unwrap().score, 0.0);
    }

    #[tokio::test]
    async fn malformed_frame_is_relayed_but_not_cached() {
        let (hub, registry, cache) = hub();
        let mut rx = register(&registry, "conn_a");

        hub.ingest(r#"{"score": 0.5, "ts": 1000.0}"#.into(), "conn_src").await;
        let before = cache.get();
        recv_text(&mut rx);

        hub.ingest("not json".into(), "conn_src").await;

        assert_eq!(cache.get(), before);
        assert_eq!(recv_text(&mut rx), "not json");
    }

    #[tokio::test]
    async fn failed_push_prunes_only_that_handle() {
        let (hub, registry, _cache) = hub();
        let mut rx_a = register(&registry, "conn_a");
        let rx_b = register(&registry, "conn_b");
        drop(rx_b); // b's writer is gone; its push must fail

        let frame = r#"{"score": 0.5, "ts": 1000.0}"#;
        hub.ingest(frame.into(), "conn_src").await;

        assert_eq!(recv_text(&mut rx_a), frame);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.snapshot()[0].id, "conn_a");
    }

    #[tokio::test]
    async fn two_viewers_then_one() {
        let (hub, registry, cache) = hub();
        let mut rx_a = register(&registry, "conn_a");
        let mut rx_b = register(&registry, "conn_b");

        let first = r#"{"score":0.82,"ts":1000.0}"#;
        hub.ingest(first.into(), "conn_src").await;
        assert_eq!(recv_text(&mut rx_a), first);
        assert_eq!(recv_text(&mut rx_b), first);
        assert_eq!(cache.get(), Some(Sample::new(0.82, 1000.0)));

        // a disconnects
        drop(rx_a);

        let second = r#"{"score":0.10,"ts":1001.0}"#;
        hub.ingest(second.into(), "conn_src").await;
        assert_eq!(recv_text(&mut rx_b), second);
        assert_eq!(registry.len(), 1);
        assert_eq!(cache.get(), Some(Sample::new(0.10, 1001.0)));
    }
}
