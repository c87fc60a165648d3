//! # Scrape Dash
//!
//! Operator dashboard for a social-media scraping backend. Shows aggregate
//! counters, lists scraping accounts and tasks, submits new ones, and starts
//! exports of completed task results.
//!
//! ## Modules
//!
//! - [`api`]: HTTP client for the backend REST API
//! - [`validate`]: form validation and display formatting
//! - [`render`]: markup for each screen region
//! - [`controller`]: wires user actions and poll ticks to the API and page
//! - [`tabs`] / [`state`]: tab, filter and load-sequence state
//! - [`notify`]: single-slot auto-dismissing notifications
//! - [`poll`]: fixed-interval refresh
//! - [`page`]: display surface abstraction and an in-memory implementation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrape_dash::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let api = Arc::new(HttpApiClient::new(&config.backend)?);
//!     let page = Arc::new(MemoryPage::new());
//!
//!     let dashboard = DashboardController::new(api, page.clone(), &config, UiState::default());
//!     dashboard.init().await;
//!     let _polling = dashboard.start_polling();
//!
//!     dashboard.submit_task(&TaskType::Hashtag, "travel", "100").await?;
//!     println!("{}", render_document(&page.snapshot()));
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod notify;
pub mod page;
pub mod poll;
pub mod render;
pub mod state;
pub mod tabs;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

/// Common imports
pub mod prelude {
    pub use crate::api::{ApiError, DashboardApi, HttpApiClient};
    pub use crate::config::Config;
    pub use crate::controller::{DashboardController, SubmitError};
    pub use crate::model::{Account, ExportFormat, StatsSnapshot, StatusFilter, Tab, Task, TaskStatus, TaskType};
    pub use crate::notify::{Notification, Notifier, Severity};
    pub use crate::page::{MemoryPage, Page};
    pub use crate::poll::PollHandle;
    pub use crate::render::render_document;
    pub use crate::state::UiState;
    pub use crate::validate::ValidationError;
}
