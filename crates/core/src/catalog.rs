//! Catalog lookups for the settings editor
//!
//! Answers `sendToPlugin` requests with workspace, project and task lists,
//! and opens links on the editor's behalf.

use std::sync::Arc;

use serde_json::Value;
use toggldeck_domain::constants::{
    ARCHIVED_PROJECT_SUFFIX, DONE_TASK_SUFFIX, MAX_PROJECT_PAGES, PROJECTS_PER_PAGE,
};
use toggldeck_domain::{
    ApiToken, ButtonId, CatalogReply, DeckError, InspectorRequest, PickerOption, Project, Result,
};
use tracing::{debug, warn};

use crate::ports::{HostOutlet, TimeTrackingService};

/// Answers settings editor requests
pub struct SettingsCatalog {
    service: Arc<dyn TimeTrackingService>,
    host: Arc<dyn HostOutlet>,
}

impl SettingsCatalog {
    /// Catalog over `service`, replying through `host`.
    pub fn new(service: Arc<dyn TimeTrackingService>, host: Arc<dyn HostOutlet>) -> Self {
        Self { service, host }
    }

    /// Handle one editor message. Unrecognised payloads are ignored.
    pub async fn handle(&self, context: &ButtonId, payload: Value) {
        let request: InspectorRequest = match serde_json::from_value(payload) {
            Ok(request) => request,
            Err(err) => {
                debug!(button = %context, error = %err, "Ignoring unrecognised editor message");
                return;
            }
        };

        let event = request.name();
        let items = match request {
            InspectorRequest::OpenUrl { site } => {
                self.host.open_url(&site_url(&site));
                return;
            }
            InspectorRequest::Workspaces { api_token } => {
                self.workspaces(api_token.as_deref()).await
            }
            InspectorRequest::Projects { api_token, workspace_id } => {
                self.projects(api_token.as_deref(), workspace_id).await
            }
            InspectorRequest::Tasks { api_token, workspace_id, project_id } => {
                self.tasks(api_token.as_deref(), workspace_id, project_id).await
            }
        };

        let reply = match items {
            Ok(items) => CatalogReply::items(event, items),
            Err(err) => {
                warn!(button = %context, request = event, error = %err, "Catalog request failed");
                CatalogReply::error(event, err.to_string())
            }
        };

        match serde_json::to_value(&reply) {
            Ok(payload) => self.host.send_to_inspector(context, payload),
            Err(err) => warn!(error = %err, "Failed to encode catalog reply"),
        }
    }

    /// Workspaces visible to the token.
    pub async fn workspaces(&self, api_token: Option<&str>) -> Result<Vec<PickerOption>> {
        let credential = credential(api_token)?;
        let workspaces = self.service.workspaces(&credential).await?;
        Ok(workspaces.into_iter().map(|w| PickerOption { id: w.id, name: w.name }).collect())
    }

    /// Every project of a workspace, active ones first.
    pub async fn projects(
        &self,
        api_token: Option<&str>,
        workspace_id: Option<u64>,
    ) -> Result<Vec<PickerOption>> {
        let credential = credential(api_token)?;
        let workspace_id = required(workspace_id, "workspace")?;

        let mut projects: Vec<Project> = Vec::new();
        for page in 1..=MAX_PROJECT_PAGES {
            let batch = self
                .service
                .projects_page(&credential, workspace_id, page, PROJECTS_PER_PAGE)
                .await?;
            if batch.is_empty() {
                break;
            }
            projects.extend(batch);
        }

        Ok(active_first(
            projects.into_iter().map(|p| (p.id, p.name, p.active)),
            ARCHIVED_PROJECT_SUFFIX,
        ))
    }

    /// Tasks of a project, open ones first.
    pub async fn tasks(
        &self,
        api_token: Option<&str>,
        workspace_id: Option<u64>,
        project_id: Option<u64>,
    ) -> Result<Vec<PickerOption>> {
        let credential = credential(api_token)?;
        let workspace_id = required(workspace_id, "workspace")?;
        let project_id = required(project_id, "project")?;

        let tasks = self.service.tasks(&credential, workspace_id, project_id).await?;
        Ok(active_first(tasks.into_iter().map(|t| (t.id, t.name, t.active)), DONE_TASK_SUFFIX))
    }
}

fn credential(api_token: Option<&str>) -> Result<ApiToken> {
    api_token
        .and_then(ApiToken::new)
        .ok_or_else(|| DeckError::InvalidInput("API token is required".into()))
}

fn required(id: Option<u64>, what: &str) -> Result<u64> {
    id.ok_or_else(|| DeckError::InvalidInput(format!("{what} is required")))
}

fn site_url(site: &str) -> String {
    let site = site.trim();
    if site.starts_with("https://") || site.starts_with("http://") {
        site.to_string()
    } else {
        format!("https://{site}")
    }
}

/// Active items keep their order and come first; inactive ones follow
/// with `suffix` appended to their name.
fn active_first(
    items: impl Iterator<Item = (u64, String, bool)>,
    suffix: &str,
) -> Vec<PickerOption> {
    let (active, inactive): (Vec<_>, Vec<_>) = items.partition(|(_, _, active)| *active);
    active
        .into_iter()
        .map(|(id, name, _)| PickerOption { id, name })
        .chain(
            inactive
                .into_iter()
                .map(|(id, name, _)| PickerOption { id, name: format!("{name}{suffix}") }),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_items_follow_with_suffix() {
        let items = vec![
            (1, "Old".to_string(), false),
            (2, "Website".to_string(), true),
            (3, "Legacy".to_string(), false),
            (4, "App".to_string(), true),
        ];

        let options = active_first(items.into_iter(), " (Archived)");
        let names: Vec<_> = options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Website", "App", "Old (Archived)", "Legacy (Archived)"]);
    }

    #[test]
    fn site_links_get_a_scheme() {
        assert_eq!(site_url("track.toggl.com/profile"), "https://track.toggl.com/profile");
        assert_eq!(site_url("https://toggl.com"), "https://toggl.com");
    }

    #[test]
    fn blank_token_is_rejected() {
        assert!(matches!(credential(Some("  ")), Err(DeckError::InvalidInput(_))));
        assert!(matches!(credential(None), Err(DeckError::InvalidInput(_))));
    }
}
