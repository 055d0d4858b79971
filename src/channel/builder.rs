use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, RwLock};
use url::Url;

use super::state::{ChannelStatus, ManagerState};
use super::ChannelManager;
use crate::messaging::ChannelEvent;
use crate::transport::TransportFactory;
use crate::types::constants::{
    DEFAULT_EVENT_BUFFER, DEFAULT_MAX_QUEUE_LEN, DEFAULT_MAX_RECONNECT_ATTEMPTS,
    DEFAULT_RECONNECT_INTERVAL_MS, MANUAL_RECONNECT_DELAY_MS,
};
use crate::types::{ChannelError, Result};

/// Configuration for a channel manager, immutable for its lifetime.
#[derive(Debug, Clone)]
pub struct ChannelOptions {
    /// Automatic reconnection attempts before giving up. Default: 5.
    pub max_reconnect_attempts: u32,
    /// Delay between automatic reconnection attempts. Default: 3s.
    pub reconnect_interval: Duration,
    /// Delay before a manual `reconnect()` dials again. Default: 1s.
    pub manual_reconnect_delay: Duration,
    /// Connect immediately on construction. Default: true.
    pub auto_connect: bool,
    /// Cap on the outbound queue while disconnected; the oldest entry is
    /// dropped on overflow. Default: 256.
    pub max_queue_len: usize,
    /// Capacity of the event stream handed to the consumer (must be > 0).
    /// Default: 64.
    pub event_buffer: usize,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            reconnect_interval: Duration::from_millis(DEFAULT_RECONNECT_INTERVAL_MS),
            manual_reconnect_delay: Duration::from_millis(MANUAL_RECONNECT_DELAY_MS),
            auto_connect: true,
            max_queue_len: DEFAULT_MAX_QUEUE_LEN,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

/// Builder for [`ChannelManager`] that validates configuration and wires the
/// event stream.
#[derive(Debug)]
pub struct ChannelBuilder {
    endpoint: String,
    options: ChannelOptions,
}

impl ChannelBuilder {
    /// Create a new builder. Fails early if the endpoint URL is malformed or
    /// not a WebSocket URL.
    pub fn new(endpoint: impl Into<String>, options: ChannelOptions) -> Result<Self> {
        let endpoint = endpoint.into();
        let url = Url::parse(&endpoint)?;
        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(ChannelError::InvalidEndpoint(format!(
                    "unsupported scheme '{}', expected ws:// or wss://",
                    other
                )));
            }
        }

        Ok(Self { endpoint, options })
    }

    /// Build the manager with an injected transport factory.
    ///
    /// Returns the manager handle and the event stream. Must be called from
    /// within a tokio runtime; when `auto_connect` is set, an initial
    /// `connect()` is spawned in the background.
    pub fn build(
        self,
        factory: Arc<dyn TransportFactory>,
    ) -> (ChannelManager, mpsc::Receiver<ChannelEvent>) {
        let (events_tx, events_rx) = mpsc::channel(self.options.event_buffer.max(1));
        let (status_tx, _status_rx) = watch::channel(ChannelStatus::Disconnected);

        let state = ManagerState::new(&self.options);
        let manager = ChannelManager {
            endpoint: self.endpoint,
            options: self.options,
            factory,
            state: Arc::new(RwLock::new(state)),
            events_tx,
            status_tx: Arc::new(status_tx),
        };

        if manager.options.auto_connect {
            let manager_cloned = manager.clone();
            tokio::spawn(async move {
                if let Err(e) = manager_cloned.connect().await {
                    tracing::debug!("Initial connect attempt failed: {}", e);
                }
            });
        }

        (manager, events_rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_websocket_endpoints() {
        assert!(ChannelBuilder::new("ws://host/ws", ChannelOptions::default()).is_ok());
        assert!(ChannelBuilder::new("wss://host/ws", ChannelOptions::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_websocket_scheme() {
        let err = ChannelBuilder::new("http://host/ws", ChannelOptions::default()).unwrap_err();
        assert!(matches!(err, ChannelError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_rejects_malformed_url() {
        let err = ChannelBuilder::new("not a url", ChannelOptions::default()).unwrap_err();
        assert!(matches!(err, ChannelError::UrlParse(_)));
    }
}
