//! Dashboard Controller
//!
//! Top-level orchestrator. Wires form submissions, filter and tab selection,
//! and poll ticks to the API client, renderer, page and notifier.
//!
//! All list loads go through a [`LoadTicket`]: a response is rendered only if
//! no newer load of the same region was issued while it was in flight.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::api::{ApiClientPaths, ApiError, DashboardApi};
use crate::config::{Config, DashboardConfig};
use crate::model::{ExportFormat, StatusFilter, Tab, TaskType};
use crate::notify::Notifier;
use crate::page::{Form, Page};
use crate::poll::PollHandle;
use crate::render::{self, Region};
use crate::state::{LoadTicket, UiState};
use crate::tabs::{TabController, TabLoad};
use crate::validate::{validate_account_input, validate_task_input, ValidationError};

/// Why a form submission did not go through
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Dashboard orchestrator. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct DashboardController {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn DashboardApi>,
    page: Arc<dyn Page>,
    notifier: Notifier,
    state: Mutex<UiState>,
    config: DashboardConfig,
    paths: ApiClientPaths,
}

impl DashboardController {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        page: Arc<dyn Page>,
        config: &Config,
        initial: UiState,
    ) -> Self {
        let notifier = Notifier::new(Arc::clone(&page), &config.notifications);

        Self {
            inner: Arc::new(Inner {
                api,
                page,
                notifier,
                state: Mutex::new(initial),
                config: config.dashboard.clone(),
                paths: ApiClientPaths::new(&config.backend.base_url),
            }),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Copy of the current UI state
    pub async fn state(&self) -> UiState {
        self.inner.state.lock().await.clone()
    }

    /// Activate the initial tab and filter, then load stats, accounts and tasks
    pub async fn init(&self) {
        let (tab, filter) = {
            let state = self.inner.state.lock().await;
            (state.active_tab, state.filter)
        };
        self.inner.page.activate_tab(tab);
        self.inner.page.activate_filter(filter);

        tracing::info!(tab = %tab, filter = %filter, "Initializing dashboard");

        futures_util::join!(self.load_stats(), self.load_accounts(), self.load_tasks());
    }

    /// Start the fixed-interval refresh
    pub fn start_polling(&self) -> PollHandle {
        PollHandle::start(self.clone(), self.inner.config.poll_interval())
    }

    /// Refresh the stats counters. Failures are logged, counters are left as they were.
    pub async fn load_stats(&self) {
        match self.inner.api.fetch_stats().await {
            Ok(stats) => {
                self.inner
                    .page
                    .replace_region(Region::Stats, render::render_stats(&stats));
            }
            Err(e) => tracing::warn!(error = %e, "Failed to load stats"),
        }
    }

    /// Reload the accounts table
    pub async fn load_accounts(&self) {
        let ticket = self.inner.state.lock().await.issue(Region::Accounts);
        self.inner
            .page
            .replace_region(Region::Accounts, render::render_accounts_loading());

        let result = self.inner.api.fetch_accounts().await;
        if !self.is_current(ticket).await {
            return;
        }

        let markup = match result {
            Ok(accounts) => {
                tracing::debug!(count = accounts.len(), "Accounts loaded");
                render::render_accounts(&accounts)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load accounts");
                render::render_accounts_error()
            }
        };
        self.inner.page.replace_region(Region::Accounts, markup);
    }

    /// Reload the tasks table with the current filter
    pub async fn load_tasks(&self) {
        let (ticket, filter) = {
            let mut state = self.inner.state.lock().await;
            (state.issue(Region::Tasks), state.filter)
        };
        self.inner
            .page
            .replace_region(Region::Tasks, render::render_tasks_loading());

        let result = self.inner.api.fetch_tasks(filter).await;
        if !self.is_current(ticket).await {
            return;
        }

        let markup = match result {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), filter = %filter, "Tasks loaded");
                render::render_tasks(&tasks, filter)
            }
            Err(e) => {
                tracing::error!(error = %e, filter = %filter, "Failed to load tasks");
                render::render_tasks_error()
            }
        };
        self.inner.page.replace_region(Region::Tasks, markup);
    }

    async fn is_current(&self, ticket: LoadTicket) -> bool {
        let current = self.inner.state.lock().await.is_current(ticket);
        if !current {
            tracing::debug!(
                region = ?ticket.region,
                seq = ticket.seq,
                "Discarding superseded response"
            );
        }
        current
    }

    /// Operator selected a tab
    pub async fn select_tab(&self, tab: Tab) {
        let load = TabController::select(&mut *self.inner.state.lock().await, tab);
        self.inner.page.activate_tab(tab);

        match load {
            Some(TabLoad::Accounts) => self.load_accounts().await,
            Some(TabLoad::Tasks(_)) => self.load_tasks().await,
            None => {}
        }
    }

    /// Operator selected a task filter
    pub async fn select_filter(&self, filter: StatusFilter) {
        self.inner.state.lock().await.filter = filter;
        self.inner.page.activate_filter(filter);
        self.load_tasks().await;
    }

    /// One poll tick: stats always, tasks only while the tasks tab is active
    pub async fn poll_tick(&self) {
        let plan = TabController::poll_plan(&*self.inner.state.lock().await);

        match plan.tasks {
            Some(_) => {
                futures_util::join!(self.load_stats(), self.load_tasks());
            }
            None => self.load_stats().await,
        }
    }

    /// Validate and submit the task form.
    ///
    /// On success the form is reset, stats refresh, and the tasks tab is
    /// activated after the configured delay.
    pub async fn submit_task(
        &self,
        task_type: &TaskType,
        target: &str,
        max_items: &str,
    ) -> Result<(), SubmitError> {
        let notifier = &self.inner.notifier;

        let task = match validate_task_input(task_type, target, max_items) {
            Ok(task) => task,
            Err(e) => {
                notifier.error(e.to_string()).await;
                return Err(e.into());
            }
        };

        notifier.info("Creating task...").await;

        if let Err(e) = self.inner.api.create_task(&task).await {
            notifier.error(failure_message("Error creating task", &e)).await;
            return Err(e.into());
        }

        tracing::info!(
            task_type = %task.task_type,
            target = %task.target,
            max_items = task.max_items,
            "Task created"
        );
        notifier
            .success(format!(
                "✅ Task created! Scraping {} items from {}",
                task.max_items, task.target
            ))
            .await;
        self.inner
            .page
            .reset_form(Form::Task, self.inner.config.default_max_items);
        self.load_stats().await;

        let controller = self.clone();
        let delay = self.inner.config.tab_switch_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.select_tab(Tab::Tasks).await;
        });

        Ok(())
    }

    /// Validate and submit the account form
    pub async fn submit_account(&self, username: &str, password: &str) -> Result<(), SubmitError> {
        let notifier = &self.inner.notifier;

        let account = match validate_account_input(username, password) {
            Ok(account) => account,
            Err(e) => {
                notifier.error(e.to_string()).await;
                return Err(e.into());
            }
        };

        notifier.info("Adding account...").await;

        if let Err(e) = self.inner.api.create_account(&account).await {
            notifier.error(failure_message("Error adding account", &e)).await;
            return Err(e.into());
        }

        tracing::info!(username = %account.username, "Account added");
        notifier.success("✅ Account added successfully!").await;
        self.inner
            .page
            .reset_form(Form::Account, self.inner.config.default_max_items);

        futures_util::join!(self.load_accounts(), self.load_stats());
        Ok(())
    }

    /// Fetch a task's scraped payload and open it in the data viewer
    pub async fn view_task_data(&self, task_id: i64) {
        let notifier = &self.inner.notifier;
        notifier.info("Loading task data...").await;

        let data = match self.inner.api.fetch_task_data(task_id).await {
            Ok(data) => data,
            Err(e) => {
                notifier
                    .error(failure_message("Error loading task data", &e))
                    .await;
                return;
            }
        };

        let empty = data.is_null() || data.as_array().is_some_and(|items| items.is_empty());
        if empty {
            notifier.warning("No data found for this task").await;
            return;
        }

        let title = format!("Task #{} - Scraped Data", task_id);
        let document = render::render_task_data(task_id, &data, &self.inner.paths);

        if self.inner.page.open_window(&title, document) {
            notifier.success("✅ Task data opened in new window").await;
        } else {
            notifier
                .warning("Please allow popups to view task data")
                .await;
        }
    }

    /// Start an export download. Nothing is awaited from the download itself.
    pub async fn export(&self, task_id: i64, format: ExportFormat) {
        let label = format.label();
        self.inner
            .notifier
            .info(format!("Downloading {}...", label))
            .await;

        let url = self.inner.api.export_url(task_id, format);
        tracing::info!(task_id, url = %url, "Starting {} export", label);
        self.inner.page.navigate(&url);

        let notifier = self.inner.notifier.clone();
        let delay = self.inner.config.export_notice_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            notifier
                .success(format!("✅ {} download started", label))
                .await;
        });
    }
}

/// Backend messages are shown verbatim, everything else gets context
fn failure_message(context: &str, error: &ApiError) -> String {
    match error {
        ApiError::Service { message, .. } => message.clone(),
        other => format!("{}: {}", context, other),
    }
}
