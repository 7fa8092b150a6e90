//! Real-time focus relay: WebSocket connections in, broadcast fan-out back out.

pub mod cache;
pub mod error;
pub mod fanout;
pub mod registry;
pub mod sample;
pub mod server;
