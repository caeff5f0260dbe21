//! HTTP client for the Toggl Track v9 API
//!
//! Every call carries the caller's token as Basic credentials; the client
//! itself holds no account state and can serve any number of tokens.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use toggldeck_core::TimeTrackingService;
use toggldeck_domain::{
    ApiConfig, ApiToken, NewTimeEntry, Project, RemoteEntry, Result, Task, Workspace,
};
use tracing::{debug, instrument};

use super::auth::basic_credentials;
use super::errors::ApiError;
use crate::http::HttpClient;

/// Toggl Track API client implementing [`TimeTrackingService`]
pub struct TogglClient {
    http: HttpClient,
    base_url: String,
}

impl TogglClient {
    /// Client configured from `config`.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout())
            .max_attempts(config.max_attempts)
            .user_agent(concat!("toggldeck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(http, &config.base_url))
    }

    /// Client over an existing HTTP client and API root.
    pub fn with_http(http: HttpClient, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// API root, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<B, T>(
        &self,
        method: Method,
        credential: &ApiToken,
        path: &str,
        body: Option<&B>,
    ) -> std::result::Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, url = %url, "Toggl request");

        let mut request = self
            .http
            .request(method, &url)
            .header(reqwest::header::AUTHORIZATION, basic_credentials(credential));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, &url, &body);
            debug!(%status, retryable = err.should_retry(), "Toggl request rejected");
            return Err(err);
        }

        if status == StatusCode::NO_CONTENT {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Client(format!("{url} returned no content where a body was expected"))
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response: {e}")))?;
        // The current-entry endpoint answers an empty body or `null` when
        // nothing is running.
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text)
            .map_err(|e| ApiError::Client(format!("failed to parse response from {url}: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, credential: &ApiToken, path: &str) -> Result<T> {
        Ok(self.call::<(), T>(Method::GET, credential, path, None).await?)
    }
}

#[async_trait]
impl TimeTrackingService for TogglClient {
    #[instrument(skip_all)]
    async fn current_entry(&self, credential: &ApiToken) -> Result<Option<RemoteEntry>> {
        let entry: Option<RemoteEntry> = self.get(credential, "/me/time_entries/current").await?;
        Ok(entry.filter(RemoteEntry::is_running))
    }

    #[instrument(skip_all, fields(workspace_id = entry.wid))]
    async fn start_entry(
        &self,
        credential: &ApiToken,
        entry: &NewTimeEntry,
    ) -> Result<RemoteEntry> {
        let path = format!("/workspaces/{}/time_entries", entry.wid);
        Ok(self.call(Method::POST, credential, &path, Some(entry)).await?)
    }

    #[instrument(skip(self, credential))]
    async fn stop_entry(
        &self,
        credential: &ApiToken,
        workspace_id: u64,
        entry_id: u64,
    ) -> Result<RemoteEntry> {
        let path = format!("/workspaces/{workspace_id}/time_entries/{entry_id}/stop");
        Ok(self.call::<(), _>(Method::PATCH, credential, &path, None).await?)
    }

    async fn workspaces(&self, credential: &ApiToken) -> Result<Vec<Workspace>> {
        self.get(credential, "/me/workspaces").await
    }

    async fn projects_page(
        &self,
        credential: &ApiToken,
        workspace_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Project>> {
        let path = format!("/workspaces/{workspace_id}/projects?page={page}&per_page={per_page}");
        let projects: Option<Vec<Project>> = self.get(credential, &path).await?;
        Ok(projects.unwrap_or_default())
    }

    async fn tasks(
        &self,
        credential: &ApiToken,
        workspace_id: u64,
        project_id: u64,
    ) -> Result<Vec<Task>> {
        let path = format!("/workspaces/{workspace_id}/projects/{project_id}/tasks");
        let tasks: Option<Vec<Task>> = self.get(credential, &path).await?;
        Ok(tasks.unwrap_or_default())
    }
}

impl std::fmt::Debug for TogglClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TogglClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

