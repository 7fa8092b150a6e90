//! Registry of live connections and their outbound handles.

use std::time::Duration;

use axum::extract::ws::Message;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;

use super::error::{DeliveryError, RegistryError};

/// Upper bound on how long a broadcast push may wait on one connection's
/// outbound buffer before the connection is treated as unreachable.
const PUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Outbound side of one live connection.
///
/// Frames pushed here are drained by the connection's writer task into the
/// WebSocket sink. The registry holds the authoritative copy for as long as
/// the peer is reachable.
#[derive(Clone)]
pub struct ConnectionHandle {
    /// Unique connection identifier (`conn_` prefixed ULID).
    pub id: String,
    tx: mpsc::Sender<Message>,
}

impl ConnectionHandle {
    pub fn new(id: String, tx: mpsc::Sender<Message>) -> Self {
        Self { id, tx }
    }

    /// Queue a frame for delivery, waiting at most [`PUSH_TIMEOUT`].
    pub async fn push(&self, msg: Message) -> Result<(), DeliveryError> {
        match self.tx.send_timeout(msg, PUSH_TIMEOUT).await {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Closed(_)) => Err(DeliveryError::Closed),
            Err(SendTimeoutError::Timeout(_)) => Err(DeliveryError::Timeout),
        }
    }
}

/// Shared registry of all live connections.
///
/// Uses `DashMap` for shard-level concurrency so unrelated connections' read
/// loops never serialize on a global lock.
pub struct ConnectionRegistry {
    connections: DashMap<String, ConnectionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a newly accepted connection.
    pub fn add(&self, handle: ConnectionHandle) -> Result<(), RegistryError> {
        match self.connections.entry(handle.id.clone()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateConnection(handle.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(handle);
                Ok(())
            }
        }
    }

    /// Remove a connection. Idempotent: removing an absent ID is a no-op.
    /// Returns whether the connection was present.
    pub fn remove(&self, id: &str) -> bool {
        self.connections.remove(id).is_some()
    }

    /// Copy-on-read view of the currently registered handles.
    ///
    /// Iterating the returned vec never observes registrations or removals
    /// that happen concurrently.
    pub fn snapshot(&self) -> Vec<ConnectionHandle> {
        self.connections.iter().map(|e| e.value().clone()).collect()
    }

    /// Number of live connections. Diagnostics only.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
