//! Remote time entries

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::button::Button;
use crate::utils::serde::{lenient_bool, nullable_string};

/// Workspace/project/task triple an entry belongs to.
///
/// Absent project or task compare as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryScope {
    pub workspace_id: Option<u64>,
    pub project_id: u64,
    pub task_id: u64,
}

impl EntryScope {
    /// Scope with absent project and task read as `0`.
    pub fn new(workspace_id: Option<u64>, project_id: Option<u64>, task_id: Option<u64>) -> Self {
        Self {
            workspace_id,
            project_id: project_id.unwrap_or(0),
            task_id: task_id.unwrap_or(0),
        }
    }
}

/// Time entry as returned by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub id: u64,
    pub workspace_id: u64,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub task_id: Option<u64>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub stop: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub billable: bool,
}

impl RemoteEntry {
    /// Workspace, project and task of the entry.
    pub fn scope(&self) -> EntryScope {
        EntryScope::new(Some(self.workspace_id), self.project_id, self.task_id)
    }

    /// Whether the entry has no stop time.
    pub fn is_running(&self) -> bool {
        self.stop.is_none()
    }

    /// Whole seconds elapsed since the entry started, never negative.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.start).num_seconds()).unwrap_or(0)
    }
}

/// Body of a start-entry request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeEntry {
    /// RFC 3339 without fractional seconds, `Z` suffix
    pub start: String,
    pub description: String,
    pub wid: u64,
    pub billable: bool,
    pub created_with: String,
    /// `-1` marks a running entry
    pub duration: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
}

impl NewTimeEntry {
    /// Running entry for `button` in `workspace_id`, started at `now`.
    pub fn for_button(
        button: &Button,
        workspace_id: u64,
        now: DateTime<Utc>,
        created_with: &str,
    ) -> Self {
        Self {
            start: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            description: button.activity.clone(),
            wid: workspace_id,
            billable: button.billable,
            created_with: created_with.to_string(),
            duration: -1,
            project_id: button.project_id,
            task_id: button.task_id,
        }
    }
}
