//! Host envelopes
//!
//! Inbound events and outbound commands exchanged with the device host as
//! JSON objects discriminated by their `event` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::button::{ButtonId, ButtonSettings};
use super::visual::ButtonState;
use crate::utils::serde::{lenient_bool, optional_id, optional_string};

/// Message sent once after connecting so the host can route events to us
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub event: String,
    pub uuid: String,
}

/// Payload shared by per-button events
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPayload {
    #[serde(default)]
    pub settings: ButtonSettings,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_in_multi_action: bool,
}

/// Events delivered by the host
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HostEvent {
    WillAppear {
        context: ButtonId,
        #[serde(default)]
        payload: ActionPayload,
    },
    WillDisappear {
        context: ButtonId,
        #[serde(default)]
        payload: ActionPayload,
    },
    DidReceiveSettings {
        context: ButtonId,
        #[serde(default)]
        payload: ActionPayload,
    },
    KeyDown {
        context: ButtonId,
        #[serde(default)]
        payload: ActionPayload,
    },
    /// Message from the settings editor
    SendToPlugin {
        context: ButtonId,
        #[serde(default)]
        payload: Value,
    },
    SystemDidWakeUp,
    /// Any event this plugin does not act on
    #[serde(other)]
    Unsupported,
}

impl HostEvent {
    /// Wire name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::WillAppear { .. } => "willAppear",
            Self::WillDisappear { .. } => "willDisappear",
            Self::DidReceiveSettings { .. } => "didReceiveSettings",
            Self::KeyDown { .. } => "keyDown",
            Self::SendToPlugin { .. } => "sendToPlugin",
            Self::SystemDidWakeUp => "systemDidWakeUp",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Payload of `setState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePayload {
    pub state: ButtonState,
}

/// Payload of `setTitle`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitlePayload {
    pub title: String,
}

/// Payload of `openUrl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPayload {
    pub url: String,
}

/// Commands sent to the host. None of them is acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HostCommand {
    SetState { context: ButtonId, payload: StatePayload },
    SetTitle { context: ButtonId, payload: TitlePayload },
    ShowAlert { context: ButtonId },
    OpenUrl { payload: UrlPayload },
    SetSettings { context: ButtonId, payload: ButtonSettings },
    GetSettings { context: ButtonId },
    SendToPropertyInspector { context: ButtonId, payload: Value },
}

/// Requests the settings editor sends through `sendToPlugin`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "request")]
pub enum InspectorRequest {
    #[serde(rename = "workspaces", rename_all = "camelCase")]
    Workspaces {
        #[serde(default, deserialize_with = "optional_string")]
        api_token: Option<String>,
    },
    #[serde(rename = "projects", rename_all = "camelCase")]
    Projects {
        #[serde(default, deserialize_with = "optional_string")]
        api_token: Option<String>,
        #[serde(default, deserialize_with = "optional_id")]
        workspace_id: Option<u64>,
    },
    #[serde(rename = "tasks", rename_all = "camelCase")]
    Tasks {
        #[serde(default, deserialize_with = "optional_string")]
        api_token: Option<String>,
        #[serde(default, deserialize_with = "optional_id")]
        workspace_id: Option<u64>,
        #[serde(default, deserialize_with = "optional_id")]
        project_id: Option<u64>,
    },
    #[serde(rename = "openUrl")]
    OpenUrl { site: String },
}

impl InspectorRequest {
    /// Wire name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Workspaces { .. } => "workspaces",
            Self::Projects { .. } => "projects",
            Self::Tasks { .. } => "tasks",
            Self::OpenUrl { .. } => "openUrl",
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_will_appear_with_extra_fields() {
        let event: HostEvent = serde_json::from_value(json!({
            "event": "willAppear",
            "action": "com.toggl.start",
            "context": "ctx-1",
            "device": "dev",
            "payload": {
                "settings": {"apiToken": "tok", "workspaceId": "5"},
                "coordinates": {"column": 0, "row": 0},
                "isInMultiAction": false
            }
        }))
        .unwrap();

        match event {
            HostEvent::WillAppear { context, payload } => {
                assert_eq!(context.as_str(), "ctx-1");
                assert_eq!(payload.settings.workspace_id, Some(5));
                assert!(!payload.is_in_multi_action);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn unknown_events_are_unsupported() {
        let event: HostEvent =
            serde_json::from_value(json!({"event": "deviceDidConnect", "device": "x"})).unwrap();
        assert_eq!(event, HostEvent::Unsupported);
    }

    #[test]
    fn key_down_without_payload_uses_defaults() {
        let event: HostEvent =
            serde_json::from_value(json!({"event": "keyDown", "context": "ctx"})).unwrap();
        assert_eq!(
            event,
            HostEvent::KeyDown { context: ButtonId::from("ctx"), payload: ActionPayload::default() }
        );
    }

    #[test]
    fn commands_serialize_to_host_envelopes() {
        let set_state = HostCommand::SetState {
            context: ButtonId::from("ctx"),
            payload: StatePayload { state: ButtonState::Inactive },
        };
        assert_eq!(
            serde_json::to_value(&set_state).unwrap(),
            json!({"event": "setState", "context": "ctx", "payload": {"state": 1}})
        );

        let alert = HostCommand::ShowAlert { context: ButtonId::from("ctx") };
        assert_eq!(
            serde_json::to_value(&alert).unwrap(),
            json!({"event": "showAlert", "context": "ctx"})
        );

        let open = HostCommand::OpenUrl { payload: UrlPayload { url: "https://toggl.com".into() } };
        assert_eq!(
            serde_json::to_value(&open).unwrap(),
            json!({"event": "openUrl", "payload": {"url": "https://toggl.com"}})
        );
    }

    #[test]
    fn decodes_inspector_requests() {
        let request: InspectorRequest = serde_json::from_value(json!({
            "request": "tasks",
            "apiToken": "tok",
            "workspaceId": "5",
            "projectId": 10
        }))
        .unwrap();

        assert_eq!(
            request,
            InspectorRequest::Tasks {
                api_token: Some("tok".into()),
                workspace_id: Some(5),
                project_id: Some(10),
            }
        );
        assert_eq!(request.name(), "tasks");
    }
}
