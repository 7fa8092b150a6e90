//! Error types for the relay gateway.

use std::fmt;

/// Failure to register a connection in the registry.
#[derive(Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The same connection ID was added twice.
    DuplicateConnection(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateConnection(id) => write!(f, "connection {id} is already registered"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Failure to push a broadcast frame to a single connection.
///
/// Always isolated to that connection: the hub prunes the handle and keeps
/// delivering to the rest.
#[derive(Debug, PartialEq, Eq)]
pub enum DeliveryError {
    /// The connection's writer task is gone (peer disconnected).
    Closed,
    /// The outbound buffer stayed full past the push timeout.
    Timeout,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "outbound channel closed"),
            Self::Timeout => write!(f, "push timed out"),
        }
    }
}

impl std::error::Error for DeliveryError {}
