//! # aiops-realtime
//!
//! A reconnecting realtime channel client for dashboard-style consumers.
//!
//! The crate manages one logical connection to a server-push WebSocket
//! endpoint: it queues outbound messages while disconnected and replays them
//! in order on recovery, retries dropped connections on a bounded budget, and
//! delivers inbound payloads plus lifecycle changes over a single event
//! stream.
//!
//! ## Example
//!
//! ```no_run
//! use aiops_realtime::{ChannelEvent, ChannelManager, ChannelOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (channel, mut events) = ChannelManager::new(
//!         "wss://aiops.example.com/ws/metrics",
//!         ChannelOptions::default(),
//!     )?;
//!
//!     // Queued until the connection opens, then flushed in order
//!     channel.send_json(serde_json::json!({"subscribe": "gpu_util"})).await?;
//!
//!     while let Some(event) = events.recv().await {
//!         match event {
//!             ChannelEvent::Message(payload) => println!("inbound: {:?}", payload),
//!             ChannelEvent::ReconnectsExhausted { attempts } => {
//!                 eprintln!("gave up after {} attempts, retrying manually", attempts);
//!                 channel.reconnect().await;
//!             }
//!             _ => {}
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod infrastructure;
pub mod messaging;
pub mod transport;
pub mod types;

pub use channel::{ChannelBuilder, ChannelManager, ChannelOptions, ChannelStatus};
pub use messaging::ChannelEvent;
pub use transport::{
    TransportEvent, TransportFactory, TransportSink, TransportStream, WebSocketConnector,
};
pub use types::{ChannelError, OutboundMessage, Payload, Result};
