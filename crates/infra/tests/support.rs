//! Shared helpers for `toggldeck-infra` integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use toggldeck_core::TimeTrackingService;
use toggldeck_domain::{
    ApiToken, DeckError, NewTimeEntry, Project, RemoteEntry, Result, Task, Workspace,
};

/// Time service with a fixed running entry and a log of started entries.
#[derive(Default)]
pub struct StaticService {
    pub running: Mutex<Option<RemoteEntry>>,
    pub started: Mutex<Vec<NewTimeEntry>>,
}

#[async_trait]
impl TimeTrackingService for StaticService {
    async fn current_entry(&self, _credential: &ApiToken) -> Result<Option<RemoteEntry>> {
        Ok(self.running.lock().clone())
    }

    async fn start_entry(&self, _credential: &ApiToken, entry: &NewTimeEntry) -> Result<RemoteEntry> {
        self.started.lock().push(entry.clone());
        Err(DeckError::Remote("start not scripted".into()))
    }

    async fn stop_entry(&self, _credential: &ApiToken, _: u64, _: u64) -> Result<RemoteEntry> {
        Err(DeckError::Remote("stop not scripted".into()))
    }

    async fn workspaces(&self, _credential: &ApiToken) -> Result<Vec<Workspace>> {
        Ok(vec![Workspace { id: 5, name: "Acme".into() }])
    }

    async fn projects_page(&self, _: &ApiToken, _: u64, _: u32, _: u32) -> Result<Vec<Project>> {
        Ok(Vec::new())
    }

    async fn tasks(&self, _: &ApiToken, _: u64, _: u64) -> Result<Vec<Task>> {
        Ok(Vec::new())
    }
}
