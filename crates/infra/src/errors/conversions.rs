//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use tokio_tungstenite::tungstenite::Error as WsError;
use toggldeck_domain::DeckError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DeckError);

impl From<InfraError> for DeckError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DeckError> for InfraError {
    fn from(value: DeckError) -> Self {
        InfraError(value)
    }
}

trait IntoDeckError {
    fn into_deck(self) -> DeckError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DeckError */
/* -------------------------------------------------------------------------- */

impl IntoDeckError for HttpError {
    fn into_deck(self) -> DeckError {
        if self.is_timeout() {
            return DeckError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return DeckError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => DeckError::Auth(message),
                404 => DeckError::NotFound(message),
                429 => DeckError::RateLimit(message),
                400..=499 => DeckError::InvalidInput(message),
                _ => DeckError::Remote(message),
            };
        }

        if self.is_decode() {
            return DeckError::Remote(format!("invalid response body: {self}"));
        }

        DeckError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_deck())
    }
}

/* -------------------------------------------------------------------------- */
/* tungstenite::Error → DeckError */
/* -------------------------------------------------------------------------- */

impl IntoDeckError for WsError {
    fn into_deck(self) -> DeckError {
        match self {
            WsError::ConnectionClosed | WsError::AlreadyClosed => {
                DeckError::Protocol("host connection closed".into())
            }
            WsError::Io(err) => DeckError::Network(format!("host socket error: {err}")),
            WsError::Url(err) => DeckError::Config(format!("invalid host url: {err}")),
            other => DeckError::Protocol(other.to_string()),
        }
    }
}

impl From<WsError> for InfraError {
    fn from(value: WsError) -> Self {
        InfraError(value.into_deck())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → DeckError */
/* -------------------------------------------------------------------------- */

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(DeckError::Protocol(format!("invalid JSON: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
