//! Transport seam between the channel manager and the network.
//!
//! The manager never talks to a socket directly: it asks a
//! [`TransportFactory`] for a fresh connection and receives the two halves of
//! a full-duplex text transport. Tests inject a fake factory; production code
//! uses [`WebSocketConnector`].

pub mod websocket;

pub use websocket::WebSocketConnector;

use async_trait::async_trait;

use crate::types::Result;

/// An inbound event from a live transport.
///
/// End of stream (the read half yielding `None`) is the close event.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// A complete inbound text frame.
    Text(String),
    /// A transport-level error. State transitions are driven by the paired
    /// close (end of stream), not by the error itself.
    Error(String),
}

/// Write half of a live transport.
///
/// `Sync` is required: the manager keeps the sink behind its shared state
/// lock, reachable from several tasks.
#[async_trait]
pub trait TransportSink: Send + Sync {
    /// Submit one text frame.
    async fn send(&mut self, text: String) -> Result<()>;

    /// Close the transport gracefully.
    async fn close(&mut self) -> Result<()>;
}

/// Read half of a live transport. Yields `None` once the transport is closed.
#[async_trait]
pub trait TransportStream: Send {
    async fn next_event(&mut self) -> Option<TransportEvent>;
}

/// Creates transports on demand.
///
/// Each call must produce a brand-new connection; the manager guarantees it
/// discards the previous transport before asking for another.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn connect(&self, url: &str) -> Result<(Box<dyn TransportSink>, Box<dyn TransportStream>)>;
}
