pub mod builder;
pub mod core;
pub mod queue;
pub mod state;

pub use builder::{ChannelBuilder, ChannelOptions};
pub use core::ChannelManager;
pub use queue::OutboundQueue;
pub use state::ChannelStatus;
