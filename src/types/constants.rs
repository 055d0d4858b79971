/// Default cap on automatic reconnection attempts.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Default delay between automatic reconnection attempts (milliseconds).
pub const DEFAULT_RECONNECT_INTERVAL_MS: u64 = 3000;

/// Delay before a manual `reconnect()` dials again (milliseconds).
/// Deliberately shorter than the automatic interval.
pub const MANUAL_RECONNECT_DELAY_MS: u64 = 1000;

/// Default cap on the outbound queue while disconnected.
/// On overflow the oldest entry is dropped.
pub const DEFAULT_MAX_QUEUE_LEN: usize = 256;

/// Default capacity of the event stream handed to the consumer.
pub const DEFAULT_EVENT_BUFFER: usize = 64;
