use tokio::task::JoinHandle;

use super::queue::OutboundQueue;
use super::ChannelOptions;
use crate::infrastructure::ReconnectBudget;
use crate::transport::TransportSink;

/// Connection state of the logical channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Disconnected,
    Connecting,
    Open,
    Closing,
}

/// Consolidated mutable state for a channel manager.
///
/// Every mutation of status, queue, budget, writer, or task handles goes
/// through the single `RwLock` around this struct, which is what preserves
/// the one-transport / one-timer invariants.
pub(crate) struct ManagerState {
    pub status: ChannelStatus,

    /// Payloads awaiting a reopened channel, strict FIFO.
    pub queue: OutboundQueue,

    /// Bounded automatic reconnect budget.
    pub budget: ReconnectBudget,

    /// Write half of the live transport, if any.
    pub writer: Option<Box<dyn TransportSink>>,

    /// Task draining the live transport's read half.
    pub read_task: Option<JoinHandle<()>>,

    /// Pending deferred connect, if any. Replacing it aborts the previous.
    pub reconnect_timer: Option<JoinHandle<()>>,

    /// Transport generation. Bumped on every connect and explicit close so
    /// callbacks from a discarded transport become no-ops.
    pub epoch: u64,

    /// Whether the last close was requested via `close()`.
    pub close_requested: bool,
}

impl ManagerState {
    pub fn new(options: &ChannelOptions) -> Self {
        Self {
            status: ChannelStatus::Disconnected,
            queue: OutboundQueue::new(options.max_queue_len),
            budget: ReconnectBudget::new(
                options.max_reconnect_attempts,
                options.reconnect_interval,
            ),
            writer: None,
            read_task: None,
            reconnect_timer: None,
            epoch: 0,
            close_requested: false,
        }
    }
}
