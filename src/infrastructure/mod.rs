pub mod reconnect;

pub use reconnect::ReconnectBudget;
