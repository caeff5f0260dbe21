//! Button settings and the validated button filter

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::entry::EntryScope;
use crate::utils::serde::{lenient_bool, nullable_string, optional_id, optional_string, value_as_u64};

/// Host-issued button identifier (the event `context`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonId(String);

impl ButtonId {
    /// Wrap a host context.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw context string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ButtonId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Bearer credential for the remote service.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiToken(String);

impl ApiToken {
    /// Returns `None` for blank tokens.
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let trimmed = token.as_ref().trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    /// The raw token, for building request credentials.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

/// How a button claims the running entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TrackingMode {
    /// Scope and description must both match
    #[default]
    Exact,
    /// Claims scoped entries regardless of description, and otherwise any
    /// entry no other button claims structurally
    Fallback,
}

impl TrackingMode {
    fn code(self) -> &'static str {
        match self {
            Self::Exact => "0",
            Self::Fallback => "1",
        }
    }

    /// `1` is the current fallback encoding; `2` was written by older
    /// editors migrating the boolean fallback toggle.
    fn from_code(code: u64) -> Self {
        match code {
            1 | 2 => Self::Fallback,
            _ => Self::Exact,
        }
    }
}

impl Serialize for TrackingMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for TrackingMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value_as_u64(&value).map(Self::from_code).unwrap_or_default())
    }
}

fn tracking_mode_setting<'de, D>(deserializer: D) -> Result<Option<TrackingMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_u64).map(TrackingMode::from_code))
}

/// Settings persisted by the host for one button.
///
/// Field names follow the settings editor layout. Decoding is lenient: the
/// editor stores form values verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonSettings {
    #[serde(default, deserialize_with = "optional_string", skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, deserialize_with = "optional_id", skip_serializing_if = "Option::is_none")]
    pub api_frequency: Option<u64>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub label: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub activity: String,
    #[serde(default, deserialize_with = "optional_id", skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<u64>,
    #[serde(default, deserialize_with = "optional_id", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(default, deserialize_with = "optional_id", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub billable_toggle: bool,
    #[serde(
        default,
        deserialize_with = "tracking_mode_setting",
        skip_serializing_if = "Option::is_none"
    )]
    pub tracking_mode: Option<TrackingMode>,
    /// Pre-`trackingMode` fallback flag
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing)]
    pub fallback_toggle: bool,
}

impl ButtonSettings {
    /// The API token, if one is set.
    pub fn credential(&self) -> Option<ApiToken> {
        self.api_token.as_deref().and_then(ApiToken::new)
    }

    /// Tracking mode, honouring the legacy fallback flag.
    pub fn effective_tracking_mode(&self) -> TrackingMode {
        match self.tracking_mode {
            Some(mode) => mode,
            None if self.fallback_toggle => TrackingMode::Fallback,
            None => TrackingMode::Exact,
        }
    }

    /// Settings written before `trackingMode` existed and still relying on
    /// the boolean fallback toggle.
    pub fn needs_migration(&self) -> bool {
        self.tracking_mode.is_none() && self.fallback_toggle
    }

    /// Copy expressed in the current layout.
    pub fn migrated(&self) -> Self {
        Self {
            tracking_mode: Some(self.effective_tracking_mode()),
            fallback_toggle: false,
            ..self.clone()
        }
    }
}

/// A registered button: the filter it applies to the running entry and the
/// entry it starts when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub id: ButtonId,
    pub credential: ApiToken,
    pub workspace_id: Option<u64>,
    pub project_id: Option<u64>,
    pub task_id: Option<u64>,
    /// Description matched against (and given to) remote entries
    pub activity: String,
    /// Title shown while idle; falls back to `activity` when blank
    pub label: String,
    pub billable: bool,
    pub tracking_mode: TrackingMode,
    pub poll_frequency: Duration,
}

impl Button {
    /// Build a button from host settings.
    ///
    /// Returns `None` when the settings carry no credential.
    pub fn from_settings(
        id: ButtonId,
        settings: &ButtonSettings,
        default_poll: Duration,
    ) -> Option<Self> {
        let credential = settings.credential()?;
        let poll_frequency =
            settings.api_frequency.map(Duration::from_secs).unwrap_or(default_poll);

        Some(Self {
            id,
            credential,
            workspace_id: settings.workspace_id,
            project_id: settings.project_id,
            task_id: settings.task_id,
            activity: settings.activity.clone(),
            label: settings.label.clone(),
            billable: settings.billable_toggle,
            tracking_mode: settings.effective_tracking_mode(),
            poll_frequency,
        })
    }

    /// Workspace, project and task this button filters on.
    pub fn scope(&self) -> EntryScope {
        EntryScope::new(self.workspace_id, self.project_id, self.task_id)
    }

    /// Whether the button uses fallback tracking.
    pub fn is_fallback(&self) -> bool {
        self.tracking_mode == TrackingMode::Fallback
    }

    /// Label shown on the button.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.activity
        } else {
            &self.label
        }
    }
}
