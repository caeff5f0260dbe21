//! Host WebSocket session
//!
//! One connection per process. A writer task drains the command queue into
//! the socket while the reader loop hands events to the dispatcher one at a
//! time, in the order the host sent them.

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use toggldeck_core::EventDispatcher;
use toggldeck_domain::{DeckError, HostCommand, Registration, Result};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::protocol::{decode_event, encode_command, encode_registration, host_url, registration};
use crate::errors::InfraError;

/// WebSocket session with the device host
#[derive(Debug, Clone)]
pub struct HostBridge {
    url: Url,
    registration: Registration,
}

impl HostBridge {
    /// Bridge to the host listening on `port`.
    pub fn new(port: u16, plugin_uuid: &str, register_event: &str) -> Result<Self> {
        Ok(Self { url: host_url(port)?, registration: registration(register_event, plugin_uuid) })
    }

    /// Host endpoint.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Connect, register and pump messages until the host closes the socket.
    #[instrument(skip_all, fields(url = %self.url))]
    pub async fn run(
        self,
        mut commands: UnboundedReceiver<HostCommand>,
        dispatcher: &EventDispatcher,
    ) -> Result<()> {
        let (socket, _) =
            connect_async(self.url.as_str()).await.map_err(|e| DeckError::from(InfraError::from(e)))?;
        let (mut sink, mut stream) = socket.split();

        sink.send(Message::Text(encode_registration(&self.registration)?))
            .await
            .map_err(|e| DeckError::from(InfraError::from(e)))?;
        info!("Registered with host");

        let writer = tokio::spawn(async move {
            while let Some(command) = commands.recv().await {
                let text = match encode_command(&command) {
                    Ok(text) => text,
                    Err(err) => {
                        warn!(error = %err, "Dropping unencodable command");
                        continue;
                    }
                };
                if let Err(err) = sink.send(Message::Text(text)).await {
                    warn!(error = %err, "Host socket write failed");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let outcome = loop {
            let Some(message) = stream.next().await else {
                break Ok(());
            };
            match message {
                Ok(Message::Text(text)) => match decode_event(&text) {
                    Ok(event) => dispatcher.dispatch(event).await,
                    Err(err) => warn!(error = %err, "Ignoring malformed host message"),
                },
                Ok(Message::Close(frame)) => {
                    info!(?frame, "Host closed the connection");
                    break Ok(());
                }
                Ok(other) => debug!(kind = message_kind(&other), "Ignoring non-text frame"),
                Err(err) => break Err(DeckError::from(InfraError::from(err))),
            }
        };

        dispatcher.shutdown().await;
        writer.abort();
        outcome
    }
}

fn message_kind(message: &Message) -> &'static str {
    match message {
        Message::Text(_) => "text",
        Message::Binary(_) => "binary",
        Message::Ping(_) => "ping",
        Message::Pong(_) => "pong",
        Message::Close(_) => "close",
        Message::Frame(_) => "frame",
    }
}
