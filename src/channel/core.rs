use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use serde::Serialize;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;

use super::builder::{ChannelBuilder, ChannelOptions};
use super::state::{ChannelStatus, ManagerState};
use crate::messaging::ChannelEvent;
use crate::transport::{
    TransportEvent, TransportFactory, TransportSink, TransportStream, WebSocketConnector,
};
use crate::types::{OutboundMessage, Payload, Result};

/// A best-effort-connected logical channel to a server-push endpoint.
///
/// The manager owns at most one live transport at a time. While disconnected
/// it queues outbound messages and replays them in FIFO order once the
/// connection reopens. Unrequested disconnects trigger a bounded, delayed
/// reconnect; exhausting the budget is reported and recoverable via
/// [`reconnect()`](Self::reconnect).
///
/// All failures are surfaced as [`ChannelEvent`]s on the stream returned at
/// construction; nothing panics across the manager boundary.
///
/// # Example
///
/// ```no_run
/// use aiops_realtime::{ChannelManager, ChannelOptions, ChannelEvent};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (channel, mut events) = ChannelManager::new(
///     "wss://aiops.example.com/ws/metrics",
///     ChannelOptions::default(),
/// )?;
///
/// channel.send_json(serde_json::json!({"subscribe": "cpu"})).await?;
///
/// while let Some(event) = events.recv().await {
///     match event {
///         ChannelEvent::Message(payload) => println!("{:?}", payload),
///         ChannelEvent::ReconnectsExhausted { .. } => channel.reconnect().await,
///         _ => {}
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ChannelManager {
    pub(crate) endpoint: String,
    pub(crate) options: ChannelOptions,
    pub(crate) factory: Arc<dyn TransportFactory>,

    // Consolidated mutable state behind one lock
    pub(crate) state: Arc<RwLock<ManagerState>>,

    pub(crate) events_tx: mpsc::Sender<ChannelEvent>,
    pub(crate) status_tx: Arc<watch::Sender<ChannelStatus>>,
}

impl ChannelManager {
    /// Create a manager backed by the production WebSocket transport.
    ///
    /// Returns the manager handle and the event stream. Must be called from
    /// within a tokio runtime. Use [`ChannelBuilder`] directly to inject a
    /// different transport factory.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::UrlParse`](crate::ChannelError::UrlParse) if
    /// the endpoint URL is malformed.
    pub fn new(
        endpoint: impl Into<String>,
        options: ChannelOptions,
    ) -> Result<(Self, mpsc::Receiver<ChannelEvent>)> {
        Ok(ChannelBuilder::new(endpoint, options)?.build(Arc::new(WebSocketConnector)))
    }

    /// Establish the transport. Idempotent while `Connecting` or `Open`; a
    /// second live transport is never created.
    ///
    /// On success the outbound queue is flushed FIFO before the `Open` event
    /// is emitted. On failure the error is emitted as an event and the
    /// unrequested-close path runs (budget consulted, retry scheduled or
    /// give-up signalled); the error is also returned for callers that want
    /// it.
    ///
    /// The future is boxed: the deferred-connect timer awaits it, and an
    /// unboxed future would make the connect/close-handling/schedule future
    /// types mutually recursive.
    pub fn connect(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(self.connect_inner(None))
    }

    /// A dial fired by a reconnect timer. Carries the epoch current when the
    /// timer was scheduled so a close() or newer transport supersedes it.
    fn connect_scheduled(&self, scheduled_epoch: u64) -> BoxFuture<'_, Result<()>> {
        Box::pin(self.connect_inner(Some(scheduled_epoch)))
    }

    async fn connect_inner(&self, scheduled_for: Option<u64>) -> Result<()> {
        let epoch = {
            let mut state = self.state.write().await;
            if let Some(scheduled_epoch) = scheduled_for {
                if state.close_requested || state.epoch != scheduled_epoch {
                    tracing::debug!("Discarding superseded scheduled connect");
                    return Ok(());
                }
            }
            if matches!(state.status, ChannelStatus::Open | ChannelStatus::Connecting) {
                return Ok(());
            }
            state.status = ChannelStatus::Connecting;
            state.close_requested = false;
            state.epoch += 1;
            state.epoch
        };
        self.status_tx.send_replace(ChannelStatus::Connecting);
        tracing::info!("Connecting to {}", self.endpoint);

        match self.factory.connect(&self.endpoint).await {
            Ok((sink, stream)) => {
                self.install_transport(epoch, sink, stream).await;
                Ok(())
            }
            Err(err) => {
                tracing::error!("Failed to open transport: {}", err);
                self.emit(ChannelEvent::Error(err.to_string())).await;
                self.handle_transport_closed(epoch).await;
                Err(err)
            }
        }
    }

    /// Submit a payload, queuing it if the channel is not open.
    ///
    /// Raw text is sent verbatim; structured values are encoded as JSON.
    /// Sending while disconnected is not an error: the payload is appended to
    /// the outbound queue and replayed, in arrival order, on the next open.
    /// A transport-level send failure is surfaced as an `Error` event and the
    /// payload is requeued; the paired close event drives recovery. While any
    /// messages are still queued, later sends queue behind them so the
    /// transport always observes issue order.
    pub async fn send(&self, payload: impl Into<OutboundMessage>) -> Result<()> {
        let message = payload.into();
        let mut state = self.state.write().await;

        // Direct write only when nothing is queued ahead: a non-empty queue
        // means earlier messages are still awaiting replay, and writing past
        // them would reorder the stream.
        if state.status == ChannelStatus::Open && state.queue.is_empty() {
            if let Some(writer) = state.writer.as_mut() {
                let text = message.encode()?;
                if let Err(err) = writer.send(text).await {
                    tracing::warn!("Send failed, requeuing message: {}", err);
                    state.queue.push_front(message);
                    drop(state);
                    self.emit(ChannelEvent::Error(err.to_string())).await;
                }
                return Ok(());
            }
        }

        tracing::debug!(
            "Channel not open, queuing message ({} pending)",
            state.queue.len() + 1
        );
        state.queue.push(message);
        Ok(())
    }

    /// Submit any serializable value as a JSON payload.
    pub async fn send_json<T: Serialize>(&self, value: T) -> Result<()> {
        self.send(OutboundMessage::json(value)?).await
    }

    /// Close the channel and suppress any pending or future automatic
    /// reconnect. Idempotent.
    pub async fn close(&self) {
        let (writer, was_live) = {
            let mut state = self.state.write().await;
            state.close_requested = true;
            state.budget.exhaust();
            // Stale callbacks from the discarded transport become no-ops
            state.epoch += 1;

            if let Some(timer) = state.reconnect_timer.take() {
                timer.abort();
            }
            if let Some(read_task) = state.read_task.take() {
                read_task.abort();
            }

            let was_live = state.status != ChannelStatus::Disconnected;
            if was_live {
                state.status = ChannelStatus::Closing;
            }
            (state.writer.take(), was_live)
        };

        if was_live {
            self.status_tx.send_replace(ChannelStatus::Closing);
        }

        if let Some(mut writer) = writer {
            if let Err(err) = writer.close().await {
                tracing::debug!("Error closing transport: {}", err);
            }
        }

        if was_live {
            {
                let mut state = self.state.write().await;
                state.status = ChannelStatus::Disconnected;
            }
            self.status_tx.send_replace(ChannelStatus::Disconnected);
            tracing::info!("Channel closed");
            self.emit(ChannelEvent::Closed).await;
        }
    }

    /// Manual recovery: close, reset the reconnect budget, and dial again
    /// after a short delay. The intended escape hatch once the automatic
    /// budget is spent.
    pub async fn reconnect(&self) {
        tracing::info!("Manual reconnect requested");
        self.close().await;
        {
            let mut state = self.state.write().await;
            state.budget.reset();
            state.close_requested = false;
        }
        self.schedule_connect(self.options.manual_reconnect_delay)
            .await;
    }

    /// Current connection state.
    pub async fn status(&self) -> ChannelStatus {
        self.state.read().await.status
    }

    /// Whether the channel is currently open.
    pub async fn is_connected(&self) -> bool {
        self.status().await == ChannelStatus::Open
    }

    /// Reactive view of the connection state.
    pub fn watch_status(&self) -> watch::Receiver<ChannelStatus> {
        self.status_tx.subscribe()
    }

    /// Automatic reconnect attempts consumed since the last open.
    pub async fn reconnect_attempts(&self) -> u32 {
        self.state.read().await.budget.attempts()
    }

    /// Number of messages waiting for the channel to reopen.
    pub async fn pending_messages(&self) -> usize {
        self.state.read().await.queue.len()
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Adopt a freshly opened transport: flush the queue, start the read
    /// task, and announce the open.
    async fn install_transport(
        &self,
        epoch: u64,
        mut sink: Box<dyn TransportSink>,
        stream: Box<dyn TransportStream>,
    ) {
        let replay_error = {
            let mut state = self.state.write().await;
            if state.epoch != epoch || state.status != ChannelStatus::Connecting {
                // close() intervened during the handshake; discard
                tracing::debug!("Discarding transport superseded during handshake");
                drop(state);
                let _ = sink.close().await;
                return;
            }

            state.status = ChannelStatus::Open;
            state.budget.reset();

            // Flush under the lock so a concurrent send() cannot interleave
            // with the replay and break FIFO ordering.
            let mut replay_error = None;
            while let Some(message) = state.queue.pop_front() {
                let text = match message.encode() {
                    Ok(text) => text,
                    Err(err) => {
                        tracing::warn!("Dropping unencodable queued message: {}", err);
                        continue;
                    }
                };
                if let Err(err) = sink.send(text).await {
                    tracing::warn!("Replaying queued message failed: {}", err);
                    state.queue.push_front(message);
                    replay_error = Some(err.to_string());
                    break;
                }
            }

            state.writer = Some(sink);
            state.read_task = Some(self.spawn_read_task(stream, epoch));
            replay_error
        };

        self.status_tx.send_replace(ChannelStatus::Open);
        self.emit(ChannelEvent::Open).await;
        tracing::info!("Channel open to {}", self.endpoint);

        if let Some(err) = replay_error {
            self.emit(ChannelEvent::Error(err)).await;
        }
    }

    /// Drain the transport's read half, forwarding inbound payloads until the
    /// transport closes.
    fn spawn_read_task(&self, mut stream: Box<dyn TransportStream>, epoch: u64) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            tracing::debug!("Read task started");
            while let Some(event) = stream.next_event().await {
                match event {
                    TransportEvent::Text(text) => {
                        manager
                            .emit(ChannelEvent::Message(Payload::parse(text)))
                            .await;
                    }
                    TransportEvent::Error(err) => {
                        // Reported only; the paired close drives the state
                        tracing::warn!("Transport error: {}", err);
                        manager.emit(ChannelEvent::Error(err)).await;
                    }
                }
            }
            tracing::debug!("Read task finished, transport closed");
            manager.handle_transport_closed(epoch).await;
        })
    }

    /// React to the transport going away. No-op for a superseded transport.
    async fn handle_transport_closed(&self, epoch: u64) {
        enum Recovery {
            Retry(Duration, u32, u32),
            GiveUp(u32),
            Requested,
        }

        let recovery = {
            let mut state = self.state.write().await;
            if state.epoch != epoch {
                return;
            }
            state.writer = None;
            state.read_task = None;
            state.status = ChannelStatus::Disconnected;

            if state.close_requested {
                Recovery::Requested
            } else {
                let max = self.options.max_reconnect_attempts;
                match state.budget.next_delay() {
                    Some(delay) => {
                        // The timer must be stored in the same critical
                        // section as the retry decision: a close() racing
                        // with this handler has to find it to cancel it.
                        let timer = self.spawn_reconnect_timer(delay, state.epoch);
                        if let Some(prev) = state.reconnect_timer.replace(timer) {
                            prev.abort();
                        }
                        Recovery::Retry(delay, state.budget.attempts(), max)
                    }
                    None => Recovery::GiveUp(state.budget.attempts()),
                }
            }
        };

        self.status_tx.send_replace(ChannelStatus::Disconnected);
        tracing::info!("Disconnected from {}", self.endpoint);
        self.emit(ChannelEvent::Closed).await;

        match recovery {
            Recovery::Retry(delay, attempt, max) => {
                tracing::info!("Reconnecting in {:?} ({}/{})", delay, attempt, max);
            }
            Recovery::GiveUp(attempts) => {
                tracing::error!("Max reconnect attempts reached ({})", attempts);
                self.emit(ChannelEvent::ReconnectsExhausted { attempts })
                    .await;
            }
            Recovery::Requested => {}
        }
    }

    /// Schedule a deferred connect, replacing (and cancelling) any pending
    /// one so at most one timer exists at a time.
    async fn schedule_connect(&self, delay: Duration) {
        let mut state = self.state.write().await;
        let timer = self.spawn_reconnect_timer(delay, state.epoch);
        if let Some(prev) = state.reconnect_timer.replace(timer) {
            prev.abort();
        }
    }

    /// Timer task for a deferred connect. The dial itself re-checks the
    /// captured epoch under the lock, so a timer that outlives its schedule
    /// (or slips past an abort) never redials a closed channel.
    fn spawn_reconnect_timer(&self, delay: Duration, epoch: u64) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = manager.connect_scheduled(epoch).await {
                tracing::debug!("Scheduled connect attempt failed: {}", err);
            }
        })
    }

    async fn emit(&self, event: ChannelEvent) {
        if self.events_tx.send(event).await.is_err() {
            tracing::debug!("Event receiver dropped, discarding event");
        }
    }
}
