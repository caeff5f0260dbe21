//! Outbound command queue

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use toggldeck_core::HostOutlet;
use toggldeck_domain::HostCommand;
use tracing::debug;

/// [`HostOutlet`] that queues commands for the connection's writer task.
#[derive(Debug, Clone)]
pub struct ChannelOutlet {
    tx: UnboundedSender<HostCommand>,
}

impl HostOutlet for ChannelOutlet {
    fn send(&self, command: HostCommand) {
        if self.tx.send(command).is_err() {
            debug!("Host connection closed; dropping command");
        }
    }
}

/// Outlet plus the receiver the writer task drains.
pub fn command_channel() -> (ChannelOutlet, UnboundedReceiver<HostCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelOutlet { tx }, rx)
}
