//! HTTP client for the taskdeck data service.
//!
//! The dashboard owns no data: tasks, bugs and project progress live in an
//! external service and are consumed over JSON endpoints. This crate
//! provides an async client for those endpoints plus the batched dashboard
//! fetch the overview page is built from.

pub mod error;

pub use error::{ApiError, ApiResult};

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use taskdeck_core::{Bug, BugStats, NewTask, ProjectProgress, Task, TaskStats};

/// Default base URL for the data service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8321";

/// Timeout applied to every request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the task/bug/project data service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// One consistent snapshot of everything the dashboard renders.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub task_stats: TaskStats,
    pub bug_stats: BugStats,
    pub progress: ProjectProgress,
    pub tasks: Vec<Task>,
    pub bugs: Vec<Bug>,
}

impl ApiClient {
    /// Create a client for the service at `base_url`.
    ///
    /// A trailing slash on the base URL is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Build)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client for the default service URL.
    pub fn with_default_url() -> ApiResult<Self> {
        Self::new(DEFAULT_BASE_URL)
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// GET an endpoint and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> ApiResult<T> {
        tracing::debug!(endpoint, "fetching");

        let response = self
            .client
            .get(self.endpoint_url(endpoint))
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })
    }

    /// Fetch the full task list.
    pub async fn fetch_tasks(&self) -> ApiResult<Vec<Task>> {
        self.get_json("/tasks").await
    }

    /// Fetch the full bug list.
    pub async fn fetch_bugs(&self) -> ApiResult<Vec<Bug>> {
        self.get_json("/bugs").await
    }

    /// Fetch aggregated task counters.
    pub async fn fetch_task_stats(&self) -> ApiResult<TaskStats> {
        self.get_json("/tasks/stats").await
    }

    /// Fetch aggregated bug counters.
    pub async fn fetch_bug_stats(&self) -> ApiResult<BugStats> {
        self.get_json("/bugs/stats").await
    }

    /// Fetch overall project progress.
    pub async fn fetch_project_progress(&self) -> ApiResult<ProjectProgress> {
        self.get_json("/project/progress").await
    }

    /// Create a task on the service and return the stored record.
    pub async fn create_task(&self, task: &NewTask) -> ApiResult<Task> {
        let endpoint = "/tasks";
        tracing::debug!(endpoint, title = %task.title, "creating task");

        let response = self
            .client
            .post(self.endpoint_url(endpoint))
            .json(task)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })
    }

    /// Fetch everything the dashboard renders in one concurrent batch.
    ///
    /// The five requests run concurrently and the first failure fails the
    /// whole batch: no partial snapshot is ever produced.
    pub async fn fetch_dashboard(&self) -> ApiResult<DashboardData> {
        let (task_stats, bug_stats, progress, tasks, bugs) = tokio::try_join!(
            self.fetch_task_stats(),
            self.fetch_bug_stats(),
            self.fetch_project_progress(),
            self.fetch_tasks(),
            self.fetch_bugs(),
        )?;

        Ok(DashboardData {
            task_stats,
            bug_stats,
            progress,
            tasks,
            bugs,
        })
    }
}

// The client is shared across async tasks.
static_assertions::assert_impl_all!(ApiClient: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = ApiClient::new("http://example.test:9000/").unwrap();
        assert_eq!(client.base_url(), "http://example.test:9000");
    }

    #[test]
    fn test_endpoint_url_joins_path() {
        let client = ApiClient::new("http://example.test:9000").unwrap();
        assert_eq!(
            client.endpoint_url("/tasks/stats"),
            "http://example.test:9000/tasks/stats"
        );
    }

    #[test]
    fn test_with_default_url() {
        let client = ApiClient::with_default_url().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_fetch_against_unreachable_service_is_transport_error() {
        // Port 1 is reserved; connections are refused immediately.
        let client = ApiClient::new("http://127.0.0.1:1").unwrap();

        match client.fetch_tasks().await {
            Err(ApiError::Transport { endpoint, .. }) => assert_eq!(endpoint, "/tasks"),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_dashboard_fails_whole_batch_when_unreachable() {
        let client = ApiClient::new("http://127.0.0.1:1").unwrap();
        assert!(client.fetch_dashboard().await.is_err());
    }

    #[test]
    fn test_dashboard_data_fixture_deserializes() {
        // The shapes the service returns, end to end through serde.
        let tasks: Vec<Task> = serde_json::from_str(
            r#"[{"id": "t-1", "title": "Wire up exports", "due_date": "2025-03-20", "status": "in_progress"}]"#,
        )
        .unwrap();
        let bugs: Vec<Bug> = serde_json::from_str(
            r#"[{"id": "b-1", "title": "Broken sort", "severity": "low", "reported_at": "2025-03-09T10:00:00Z"}]"#,
        )
        .unwrap();

        let data = DashboardData {
            task_stats: serde_json::from_str(
                r#"{"total": 3, "todo": 1, "in_progress": 1, "done": 1}"#,
            )
            .unwrap(),
            bug_stats: serde_json::from_str(r#"{"total": 1, "critical": 0, "medium": 0, "low": 1}"#)
                .unwrap(),
            progress: serde_json::from_str(r#"{"percent": 33, "planned_end_date": "2025-06-30"}"#)
                .unwrap(),
            tasks,
            bugs,
        };

        assert_eq!(data.task_stats.total, 3);
        assert_eq!(data.progress.percent, 33);
        assert_eq!(data.tasks[0].id, "t-1");
        assert_eq!(data.bugs[0].id, "b-1");
    }
}
