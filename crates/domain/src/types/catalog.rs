//! Workspace, project and task listings for the settings editor

use serde::{Deserialize, Serialize};

use crate::utils::serde::nullable_string;

fn default_active() -> bool {
    true
}

/// Toggl workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
}

/// Project within a workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Task within a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// One entry of a picker in the settings editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerOption {
    pub id: u64,
    pub name: String,
}

/// Reply sent back to the settings editor for a catalog request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogReply {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PickerOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CatalogReply {
    /// Successful reply to `event`.
    pub fn items(event: impl Into<String>, items: Vec<PickerOption>) -> Self {
        Self { event: event.into(), items: Some(items), error: None }
    }

    /// Failed reply to `event`.
    pub fn error(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self { event: event.into(), items: None, error: Some(message.into()) }
    }
}
