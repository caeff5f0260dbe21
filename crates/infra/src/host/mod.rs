//! WebSocket bridge to the device host

pub mod connection;
pub mod outlet;
pub mod protocol;

pub use connection::HostBridge;
pub use outlet::{command_channel, ChannelOutlet};
