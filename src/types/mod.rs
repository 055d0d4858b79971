pub mod constants;
pub mod error;
pub mod payload;

pub use constants::*;
pub use error::{ChannelError, Result};
pub use payload::{OutboundMessage, Payload};
