//! Backend API
//!
//! Client side of the scraper backend's REST API.
//!
//! # Endpoints
//!
//! - `GET /api/stats` - Aggregate counters
//! - `GET /api/accounts` / `POST /api/accounts` - List / add accounts
//! - `GET /api/tasks[?status=S]` / `POST /api/tasks` - List / create tasks
//! - `GET /api/tasks/{id}/data` - Scraped payload of a task
//! - `GET /api/tasks/{id}/export/{csv,json}` - File downloads
//! - `POST /api/tasks/{id}/cancel` - Cancel a running task
//! - `GET /api/health` - Backend health
//!
//! Every call issues exactly one request. Nothing is retried.

pub mod client;
pub mod download;
pub mod dto;
pub mod error;

pub use client::HttpApiClient;
pub use download::{download_export, DownloadError, ExportFile};
pub use dto::HealthStatus;
pub use error::{ApiError, ApiResult};

use async_trait::async_trait;
use serde_json::Value;

use crate::model::{Account, ExportFormat, StatsSnapshot, StatusFilter, Task};
use crate::validate::{NewAccount, NewTask};

/// Operations the dashboard needs from the backend.
///
/// Implementations never touch local state; callers re-fetch after a
/// mutating call.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Aggregate counters; missing fields read as zero
    async fn fetch_stats(&self) -> ApiResult<StatsSnapshot>;

    /// Accounts in backend order
    async fn fetch_accounts(&self) -> ApiResult<Vec<Account>>;

    async fn create_account(&self, account: &NewAccount) -> ApiResult<()>;

    /// Tasks in backend order, constrained server-side by the filter
    async fn fetch_tasks(&self, filter: StatusFilter) -> ApiResult<Vec<Task>>;

    async fn create_task(&self, task: &NewTask) -> ApiResult<()>;

    /// Scraped payload; `Value::Null` or an empty array means "no data"
    async fn fetch_task_data(&self, task_id: i64) -> ApiResult<Value>;

    /// Returns the backend's confirmation message
    async fn cancel_task(&self, task_id: i64) -> ApiResult<String>;

    async fn health(&self) -> ApiResult<HealthStatus>;

    /// URL that starts a file download when navigated to
    fn export_url(&self, task_id: i64, format: ExportFormat) -> String;
}

/// Builds endpoint URLs against a base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientPaths {
    base_url: String,
}

impl ApiClientPaths {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn stats(&self) -> String {
        format!("{}/api/stats", self.base_url)
    }

    pub fn health(&self) -> String {
        format!("{}/api/health", self.base_url)
    }

    pub fn accounts(&self) -> String {
        format!("{}/api/accounts", self.base_url)
    }

    pub fn tasks(&self, filter: StatusFilter) -> String {
        match filter.status() {
            Some(status) => format!(
                "{}/api/tasks?status={}",
                self.base_url,
                urlencoding::encode(status)
            ),
            None => format!("{}/api/tasks", self.base_url),
        }
    }

    pub fn task_data(&self, task_id: i64) -> String {
        format!("{}/api/tasks/{}/data", self.base_url, task_id)
    }

    pub fn cancel_task(&self, task_id: i64) -> String {
        format!("{}/api/tasks/{}/cancel", self.base_url, task_id)
    }

    pub fn export_url(&self, task_id: i64, format: ExportFormat) -> String {
        format!(
            "{}/api/tasks/{}/export/{}",
            self.base_url,
            task_id,
            format.extension()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let paths = ApiClientPaths::new("http://localhost:5000/");
        assert_eq!(paths.stats(), "http://localhost:5000/api/stats");
        assert_eq!(paths.tasks(StatusFilter::All), "http://localhost:5000/api/tasks");
        assert_eq!(
            paths.tasks(StatusFilter::Running),
            "http://localhost:5000/api/tasks?status=running"
        );
        assert_eq!(
            paths.export_url(3, ExportFormat::Csv),
            "http://localhost:5000/api/tasks/3/export/csv"
        );
    }

    #[test]
    fn test_empty_base_gives_relative_paths() {
        let paths = ApiClientPaths::new("");
        assert_eq!(paths.task_data(8), "/api/tasks/8/data");
    }
}
