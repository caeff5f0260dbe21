use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use toggldeck_core::TimeTrackingService;
use toggldeck_domain::{
    ApiToken, DeckError, NewTimeEntry, Project, RemoteEntry, Result, Task, Workspace,
};

#[derive(Default)]
struct Script {
    running: HashMap<String, RemoteEntry>,
    fail_fetch: bool,
    fail_mutations: bool,
    next_id: u64,
    fetches: usize,
    started: Vec<NewTimeEntry>,
    stopped: Vec<(u64, u64)>,
    workspaces: Vec<Workspace>,
    project_pages: Vec<Vec<Project>>,
    requested_pages: Vec<u32>,
    tasks: Vec<Task>,
}

/// In-memory remote service keyed by token.
#[derive(Default)]
pub struct ScriptedService {
    script: Mutex<Script>,
}

impl ScriptedService {
    pub fn set_running(&self, token: &str, entry: Option<RemoteEntry>) {
        let mut script = self.script.lock();
        match entry {
            Some(entry) => script.running.insert(token.to_string(), entry),
            None => script.running.remove(token),
        };
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.script.lock().fail_fetch = fail;
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.script.lock().fail_mutations = fail;
    }

    pub fn fetch_count(&self) -> usize {
        self.script.lock().fetches
    }

    pub fn started(&self) -> Vec<NewTimeEntry> {
        self.script.lock().started.clone()
    }

    pub fn stopped(&self) -> Vec<(u64, u64)> {
        self.script.lock().stopped.clone()
    }

    pub fn set_workspaces(&self, workspaces: Vec<Workspace>) {
        self.script.lock().workspaces = workspaces;
    }

    pub fn set_project_pages(&self, pages: Vec<Vec<Project>>) {
        self.script.lock().project_pages = pages;
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.script.lock().requested_pages.clone()
    }

    pub fn set_tasks(&self, tasks: Vec<Task>) {
        self.script.lock().tasks = tasks;
    }
}

#[async_trait]
impl TimeTrackingService for ScriptedService {
    async fn current_entry(&self, credential: &ApiToken) -> Result<Option<RemoteEntry>> {
        let mut script = self.script.lock();
        script.fetches += 1;
        if script.fail_fetch {
            return Err(DeckError::Network("connection refused".into()));
        }
        Ok(script.running.get(credential.expose()).cloned())
    }

    async fn start_entry(&self, credential: &ApiToken, entry: &NewTimeEntry) -> Result<RemoteEntry> {
        let mut script = self.script.lock();
        if script.fail_mutations {
            return Err(DeckError::Remote("500 Internal Server Error".into()));
        }
        script.next_id += 1;
        let created = RemoteEntry {
            id: 1000 + script.next_id,
            workspace_id: entry.wid,
            project_id: entry.project_id,
            task_id: entry.task_id,
            description: entry.description.clone(),
            start: entry.start.parse().unwrap_or_else(|_| Utc::now()),
            stop: None,
            billable: entry.billable,
        };
        script.started.push(entry.clone());
        script.running.insert(credential.expose().to_string(), created.clone());
        Ok(created)
    }

    async fn stop_entry(
        &self,
        credential: &ApiToken,
        workspace_id: u64,
        entry_id: u64,
    ) -> Result<RemoteEntry> {
        let mut script = self.script.lock();
        if script.fail_mutations {
            return Err(DeckError::Remote("500 Internal Server Error".into()));
        }
        script.stopped.push((workspace_id, entry_id));
        let mut entry = script
            .running
            .remove(credential.expose())
            .ok_or_else(|| DeckError::NotFound(format!("time entry {entry_id}")))?;
        entry.stop = Some(Utc::now());
        Ok(entry)
    }

    async fn workspaces(&self, _credential: &ApiToken) -> Result<Vec<Workspace>> {
        Ok(self.script.lock().workspaces.clone())
    }

    async fn projects_page(
        &self,
        _credential: &ApiToken,
        _workspace_id: u64,
        page: u32,
        _per_page: u32,
    ) -> Result<Vec<Project>> {
        let mut script = self.script.lock();
        script.requested_pages.push(page);
        let index = usize::try_from(page).unwrap_or(usize::MAX).saturating_sub(1);
        Ok(script.project_pages.get(index).cloned().unwrap_or_default())
    }

    async fn tasks(
        &self,
        _credential: &ApiToken,
        _workspace_id: u64,
        _project_id: u64,
    ) -> Result<Vec<Task>> {
        Ok(self.script.lock().tasks.clone())
    }
}
