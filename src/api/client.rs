//! HTTP API Client
//!
//! reqwest-based implementation of [`DashboardApi`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::dto::{ActionResponse, ErrorBody, HealthStatus};
use super::{ApiClientPaths, ApiError, ApiResult, DashboardApi, ExportFile};
use crate::config::BackendConfig;
use crate::model::{Account, ExportFormat, StatsSnapshot, StatusFilter, Task};
use crate::validate::{NewAccount, NewTask};

const REQUEST_ID_HEADER: &str = "x-request-id";
const API_KEY_HEADER: &str = "X-API-Key";

/// Backend REST API client
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    paths: ApiClientPaths,
    api_key: Option<String>,
}

impl HttpApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &BackendConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            paths: ApiClientPaths::new(&config.base_url),
            api_key: config.api_key.clone(),
        })
    }

    pub fn paths(&self) -> &ApiClientPaths {
        &self.paths
    }

    /// Attach request id and API key, send, and log the outcome
    async fn send(&self, request: RequestBuilder, what: &str) -> ApiResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        let mut request = request.header(REQUEST_ID_HEADER, &request_id);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        tracing::debug!(request_id = %request_id, "Sending {} request", what);

        match request.send().await {
            Ok(response) => {
                tracing::debug!(
                    request_id = %request_id,
                    status = response.status().as_u16(),
                    "{} response received",
                    what
                );
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "{} request failed", what);
                Err(ApiError::from_reqwest(e))
            }
        }
    }

    /// GET a JSON document
    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> ApiResult<T> {
        let response = self.send(self.client.get(url), what).await?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        response.json().await.map_err(ApiError::from_reqwest)
    }

    /// POST to an action endpoint answering `{success, error?, message?}`
    async fn post_action<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: Option<&B>,
        what: &str,
        fallback: &str,
    ) -> ApiResult<Option<String>> {
        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.send(request, what).await?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from_reqwest)?;

        let parsed: ActionResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => return Err(ApiError::Decode(e.to_string())),
            Err(_) => ActionResponse::default(),
        };

        if parsed.success && status.is_success() {
            Ok(parsed.message)
        } else {
            Err(ApiError::Service {
                status: status.as_u16(),
                message: parsed.error.unwrap_or_else(|| fallback.to_string()),
            })
        }
    }

    /// Fetch an export file body along with the server-suggested file name
    pub async fn fetch_export(&self, task_id: i64, format: ExportFormat) -> ApiResult<ExportFile> {
        let url = self.paths.export_url(task_id, format);
        let response = self.send(self.client.get(&url), "export").await?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(super::download::filename_from_disposition);

        let body = response.bytes().await.map_err(ApiError::from_reqwest)?;

        Ok(ExportFile {
            task_id,
            format,
            filename,
            body: body.to_vec(),
        })
    }
}

/// Turn a non-2xx response into a service error carrying the backend message
async fn service_error(response: Response) -> ApiError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| format!("HTTP {}", status));

    ApiError::Service {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl DashboardApi for HttpApiClient {
    async fn fetch_stats(&self) -> ApiResult<StatsSnapshot> {
        self.get_json(&self.paths.stats(), "stats").await
    }

    async fn fetch_accounts(&self) -> ApiResult<Vec<Account>> {
        self.get_json(&self.paths.accounts(), "accounts").await
    }

    /// `account` is sent as given; usernames are normalized by `validate_account_input`
    async fn create_account(&self, account: &NewAccount) -> ApiResult<()> {
        self.post_action(
            &self.paths.accounts(),
            Some(account),
            "create account",
            "Failed to add account",
        )
        .await
        .map(|_| ())
    }

    async fn fetch_tasks(&self, filter: StatusFilter) -> ApiResult<Vec<Task>> {
        self.get_json(&self.paths.tasks(filter), "tasks").await
    }

    async fn create_task(&self, task: &NewTask) -> ApiResult<()> {
        self.post_action(
            &self.paths.tasks(StatusFilter::All),
            Some(task),
            "create task",
            "Failed to create task",
        )
        .await
        .map(|_| ())
    }

    async fn fetch_task_data(&self, task_id: i64) -> ApiResult<Value> {
        let url = self.paths.task_data(task_id);
        let response = self.send(self.client.get(&url), "task data").await?;

        // The backend answers 404 when a task has nothing stored
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Value::Null);
        }
        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        response.json().await.map_err(ApiError::from_reqwest)
    }

    async fn cancel_task(&self, task_id: i64) -> ApiResult<String> {
        self.post_action::<()>(
            &self.paths.cancel_task(task_id),
            None,
            "cancel task",
            "Failed to cancel task",
        )
        .await
        .map(|message| message.unwrap_or_else(|| "Task cancelled".to_string()))
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        self.get_json(&self.paths.health(), "health").await
    }

    fn export_url(&self, task_id: i64, format: ExportFormat) -> String {
        self.paths.export_url(task_id, format)
    }
}
