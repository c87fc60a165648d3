//! In-process fake backend shared by controller and poll tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::api::{ApiClientPaths, ApiError, ApiResult, DashboardApi, HealthStatus};
use crate::model::{Account, ExportFormat, StatsSnapshot, StatusFilter, Task, TaskStatus, TaskType};
use crate::validate::{NewAccount, NewTask};

/// A call the fake received
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchStats,
    FetchAccounts,
    CreateAccount(String),
    FetchTasks(StatusFilter),
    CreateTask(Value),
    FetchTaskData(i64),
    CancelTask(i64),
    Health,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Call>,
    accounts: Vec<Account>,
    tasks: Vec<Task>,
    tasks_by_filter: HashMap<StatusFilter, Vec<Task>>,
    task_delays: HashMap<StatusFilter, Duration>,
    task_data: Value,
    list_error: Option<ApiError>,
    create_task_error: Option<ApiError>,
}

pub struct FakeApi {
    state: Mutex<FakeState>,
    paths: ApiClientPaths,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
            paths: ApiClientPaths::new("http://backend"),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn set_accounts(&self, accounts: Vec<Account>) {
        self.state.lock().unwrap().accounts = accounts;
    }

    pub fn set_tasks(&self, tasks: Vec<Task>) {
        self.state.lock().unwrap().tasks = tasks;
    }

    pub fn set_tasks_for(&self, filter: StatusFilter, tasks: Vec<Task>) {
        self.state.lock().unwrap().tasks_by_filter.insert(filter, tasks);
    }

    pub fn set_task_delay(&self, filter: StatusFilter, delay: Duration) {
        self.state.lock().unwrap().task_delays.insert(filter, delay);
    }

    pub fn set_task_data(&self, data: Value) {
        self.state.lock().unwrap().task_data = data;
    }

    pub fn fail_lists(&self, error: ApiError) {
        self.state.lock().unwrap().list_error = Some(error);
    }

    pub fn fail_create_task(&self, error: ApiError) {
        self.state.lock().unwrap().create_task_error = Some(error);
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn fetch_stats(&self) -> ApiResult<StatsSnapshot> {
        self.record(Call::FetchStats);
        let state = self.state.lock().unwrap();
        Ok(StatsSnapshot {
            total_accounts: state.accounts.len() as u64,
            active_accounts: state.accounts.iter().filter(|a| a.is_active).count() as u64,
            completed_tasks: 0,
            running_tasks: 0,
        })
    }

    async fn fetch_accounts(&self) -> ApiResult<Vec<Account>> {
        self.record(Call::FetchAccounts);
        let state = self.state.lock().unwrap();
        match &state.list_error {
            Some(e) => Err(e.clone()),
            None => Ok(state.accounts.clone()),
        }
    }

    async fn create_account(&self, account: &NewAccount) -> ApiResult<()> {
        self.record(Call::CreateAccount(account.username.clone()));
        Ok(())
    }

    /// The response is fixed when the request arrives; the delay only holds it back
    async fn fetch_tasks(&self, filter: StatusFilter) -> ApiResult<Vec<Task>> {
        self.record(Call::FetchTasks(filter));
        let (response, delay) = {
            let state = self.state.lock().unwrap();
            let response = match &state.list_error {
                Some(e) => Err(e.clone()),
                None => Ok(state
                    .tasks_by_filter
                    .get(&filter)
                    .cloned()
                    .unwrap_or_else(|| state.tasks.clone())),
            };
            (response, state.task_delays.get(&filter).copied())
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }

    async fn create_task(&self, task: &NewTask) -> ApiResult<()> {
        self.record(Call::CreateTask(serde_json::to_value(task).unwrap()));
        match self.state.lock().unwrap().create_task_error.clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn fetch_task_data(&self, task_id: i64) -> ApiResult<Value> {
        self.record(Call::FetchTaskData(task_id));
        Ok(self.state.lock().unwrap().task_data.clone())
    }

    async fn cancel_task(&self, task_id: i64) -> ApiResult<String> {
        self.record(Call::CancelTask(task_id));
        Ok("Task cancelled".to_string())
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        self.record(Call::Health);
        Ok(HealthStatus {
            status: "healthy".to_string(),
            database: Some("connected".to_string()),
            active_scrapers: Some(0),
            timestamp: None,
        })
    }

    fn export_url(&self, task_id: i64, format: ExportFormat) -> String {
        self.paths.export_url(task_id, format)
    }
}

pub fn task(id: i64, status: TaskStatus) -> Task {
    Task {
        id,
        task_type: TaskType::Profile,
        target: format!("user{}", id),
        status,
        created_at: "2024-01-01 10:00:00".to_string(),
        max_items: Some(50),
    }
}

pub fn account(id: i64, username: &str) -> Account {
    Account {
        id,
        username: username.to_string(),
        status: "active".to_string(),
        tasks_completed: 0,
        last_used: None,
        is_active: true,
    }
}
