//! Port interfaces for the reconciliation engine
//!
//! These traits define the boundaries between core logic and the
//! infrastructure adapters that talk HTTP and WebSocket.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use toggldeck_domain::{
    ApiToken, ButtonId, ButtonSettings, ButtonState, HostCommand, NewTimeEntry, Project,
    RemoteEntry, Result, StatePayload, Task, TitlePayload, UrlPayload, Workspace,
};

/// Remote time tracking service, addressed per credential
#[async_trait]
pub trait TimeTrackingService: Send + Sync {
    /// The running entry for this credential, if any
    async fn current_entry(&self, credential: &ApiToken) -> Result<Option<RemoteEntry>>;

    /// Start a new running entry and return it as created
    async fn start_entry(&self, credential: &ApiToken, entry: &NewTimeEntry)
        -> Result<RemoteEntry>;

    /// Stop a running entry and return it as stopped
    async fn stop_entry(
        &self,
        credential: &ApiToken,
        workspace_id: u64,
        entry_id: u64,
    ) -> Result<RemoteEntry>;

    /// Workspaces visible to this credential
    async fn workspaces(&self, credential: &ApiToken) -> Result<Vec<Workspace>>;

    /// One page of projects, `page` starting at 1
    async fn projects_page(
        &self,
        credential: &ApiToken,
        workspace_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Project>>;

    /// Tasks of one project
    async fn tasks(
        &self,
        credential: &ApiToken,
        workspace_id: u64,
        project_id: u64,
    ) -> Result<Vec<Task>>;
}

/// Outbound side of the host channel.
///
/// Commands are fire-and-forget; the host never acknowledges them.
pub trait HostOutlet: Send + Sync {
    fn send(&self, command: HostCommand);

    fn set_state(&self, context: &ButtonId, state: ButtonState) {
        self.send(HostCommand::SetState {
            context: context.clone(),
            payload: StatePayload { state },
        });
    }

    fn set_title(&self, context: &ButtonId, title: &str) {
        self.send(HostCommand::SetTitle {
            context: context.clone(),
            payload: TitlePayload { title: title.to_string() },
        });
    }

    fn show_alert(&self, context: &ButtonId) {
        self.send(HostCommand::ShowAlert { context: context.clone() });
    }

    fn open_url(&self, url: &str) {
        self.send(HostCommand::OpenUrl { payload: UrlPayload { url: url.to_string() } });
    }

    fn set_settings(&self, context: &ButtonId, settings: &ButtonSettings) {
        self.send(HostCommand::SetSettings { context: context.clone(), payload: settings.clone() });
    }

    fn get_settings(&self, context: &ButtonId) {
        self.send(HostCommand::GetSettings { context: context.clone() });
    }

    fn send_to_inspector(&self, context: &ButtonId, payload: Value) {
        self.send(HostCommand::SendToPropertyInspector { context: context.clone(), payload });
    }
}

/// Wall clock
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
