//! Wire encoding of host messages
//!
//! Every frame is a JSON text message.

use toggldeck_domain::{DeckError, HostCommand, HostEvent, Registration, Result};
use url::Url;

use crate::errors::InfraError;

/// Local endpoint the host listens on.
pub fn host_url(port: u16) -> Result<Url> {
    Url::parse(&format!("ws://127.0.0.1:{port}"))
        .map_err(|e| DeckError::Config(format!("invalid host port {port}: {e}")))
}

/// Registration message for this plugin instance.
pub fn registration(register_event: &str, plugin_uuid: &str) -> Registration {
    Registration { event: register_event.to_string(), uuid: plugin_uuid.to_string() }
}

/// Registration as a JSON text frame.
pub fn encode_registration(registration: &Registration) -> Result<String> {
    serde_json::to_string(registration).map_err(|e| InfraError::from(e).into())
}

/// Command as a JSON text frame.
pub fn encode_command(command: &HostCommand) -> Result<String> {
    serde_json::to_string(command).map_err(|e| InfraError::from(e).into())
}

/// Event from a JSON text frame.
pub fn decode_event(text: &str) -> Result<HostEvent> {
    serde_json::from_str(text).map_err(|e| InfraError::from(e).into())
}
