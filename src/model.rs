//! Dashboard data model
//!
//! Transient, read-only copies of entities owned by the backend:
//! - `Account`: a scraping identity managed by the backend
//! - `Task`: a unit of scraping work and its lifecycle status
//! - `StatsSnapshot`: aggregate counters
//! - `StatusFilter` and `Tab`: UI selection state

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A backend-managed account used to perform scraping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: i64,
    pub username: String,
    /// Backend-defined status label, rendered opaquely
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tasks_completed: u64,
    #[serde(default)]
    pub last_used: Option<String>,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub is_active: bool,
}

/// A scraping task as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: i64,
    pub task_type: TaskType,
    pub target: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub max_items: Option<u32>,
}

/// Aggregate counters recomputed by the backend on every fetch
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsSnapshot {
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_accounts: u64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub active_accounts: u64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub completed_tasks: u64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub running_tasks: u64,
}

fn count_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

/// SQLite hands booleans back as 0/1
fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
        Flag::Null(()) => false,
    })
}

/// Kind of scraping work
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    Profile,
    Posts,
    Hashtag,
    Followers,
    Following,
    /// A type this client does not know about
    Other(String),
}

impl TaskType {
    /// The five task types the backend accepts
    pub fn known() -> &'static [TaskType] {
        &[
            TaskType::Profile,
            TaskType::Posts,
            TaskType::Hashtag,
            TaskType::Followers,
            TaskType::Following,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskType::Profile => "profile",
            TaskType::Posts => "posts",
            TaskType::Hashtag => "hashtag",
            TaskType::Followers => "followers",
            TaskType::Following => "following",
            TaskType::Other(s) => s,
        }
    }

    /// Types whose target is a bare username
    pub fn targets_username(&self) -> bool {
        matches!(
            self,
            TaskType::Profile | TaskType::Posts | TaskType::Followers | TaskType::Following
        )
    }
}

impl From<String> for TaskType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "profile" => TaskType::Profile,
            "posts" => TaskType::Posts,
            "hashtag" => TaskType::Hashtag,
            "followers" => TaskType::Followers,
            "following" => TaskType::Following,
            _ => TaskType::Other(s),
        }
    }
}

impl From<&str> for TaskType {
    fn from(s: &str) -> Self {
        TaskType::from(s.to_string())
    }
}

impl From<TaskType> for String {
    fn from(t: TaskType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a task, driven entirely by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Other(s) => s,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => TaskStatus::Pending,
            "running" => TaskStatus::Running,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            _ => TaskStatus::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(s: TaskStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task-status filter applied to task list loads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Running,
    Completed,
    Failed,
}

impl StatusFilter {
    pub fn all() -> &'static [StatusFilter] {
        &[
            StatusFilter::All,
            StatusFilter::Pending,
            StatusFilter::Running,
            StatusFilter::Completed,
            StatusFilter::Failed,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Running => "running",
            StatusFilter::Completed => "completed",
            StatusFilter::Failed => "failed",
        }
    }

    /// Server-side status constraint, `None` for `All`
    pub fn status(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            other => Some(other.as_str()),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "running" => Ok(StatusFilter::Running),
            "completed" => Ok(StatusFilter::Completed),
            "failed" => Ok(StatusFilter::Failed),
            other => Err(format!("unknown status filter: {}", other)),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level dashboard views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Task and account submission forms
    #[default]
    Create,
    Tasks,
    Accounts,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Create, Tab::Tasks, Tab::Accounts]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Create => "create",
            Tab::Tasks => "tasks",
            Tab::Accounts => "accounts",
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(Tab::Create),
            "tasks" => Ok(Tab::Tasks),
            "accounts" => Ok(Tab::Accounts),
            other => Err(format!("unknown tab: {}", other)),
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Export file format offered for completed tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Path segment and file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_deserialize_unknown_values() {
        let task: Task = serde_json::from_str(
            r#"{"id": 7, "task_type": "reels", "target": "bob", "status": "queued",
                "created_at": "2024-01-02 03:04:05"}"#,
        )
        .unwrap();

        assert_eq!(task.task_type, TaskType::Other("reels".to_string()));
        assert_eq!(task.status, TaskStatus::Other("queued".to_string()));
        assert_eq!(task.max_items, None);
    }

    #[test]
    fn test_task_type_roundtrip_known() {
        for t in TaskType::known() {
            assert_eq!(&TaskType::from(t.as_str()), t);
        }
        assert!(TaskType::Followers.targets_username());
        assert!(!TaskType::Hashtag.targets_username());
    }

    #[test]
    fn test_account_is_active_from_integer() {
        let account: Account = serde_json::from_str(
            r#"{"id": 1, "username": "alice", "status": "available",
                "tasks_completed": 3, "last_used": null, "is_active": 1}"#,
        )
        .unwrap();

        assert!(account.is_active);
        assert_eq!(account.last_used, None);
    }

    #[test]
    fn test_stats_missing_fields_default_to_zero() {
        let stats: StatsSnapshot =
            serde_json::from_str(r#"{"total_accounts": 4, "active_accounts": null}"#).unwrap();
        assert_eq!(stats.total_accounts, 4);
        assert_eq!(stats.active_accounts, 0);
        assert_eq!(stats.running_tasks, 0);
    }

    #[test]
    fn test_status_filter_query_value() {
        assert_eq!(StatusFilter::All.status(), None);
        assert_eq!(StatusFilter::Completed.status(), Some("completed"));
        assert_eq!("Running".parse::<StatusFilter>(), Ok(StatusFilter::Running));
        assert!("done".parse::<StatusFilter>().is_err());
    }
}
