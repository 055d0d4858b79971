use crate::types::Payload;

/// Lifecycle and data events emitted by a channel manager.
///
/// Events are delivered at most once each, in order, over the `mpsc` stream
/// returned at construction. This replaces the ad-hoc callback style
/// (`on_open`, `on_message`, ...) with a single subscribable stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The transport opened and any queued messages were flushed.
    Open,

    /// An inbound message, parsed as JSON when possible, raw text otherwise.
    Message(Payload),

    /// A transport-level error. Not a state change by itself; if the
    /// transport dies, a `Closed` event follows.
    Error(String),

    /// The transport closed (requested or not).
    Closed,

    /// The automatic reconnect budget is spent. No further connects will be
    /// scheduled until a manual `reconnect()`.
    ReconnectsExhausted { attempts: u32 },
}
