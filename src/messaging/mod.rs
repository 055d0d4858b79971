pub mod event;

pub use event::ChannelEvent;
