//! Notification Emitter
//!
//! Single-slot transient message surface. Showing a notification replaces
//! whatever is on screen; each one dismisses itself after a timeout that
//! depends on its severity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::config::NotificationConfig;
use crate::page::Page;

/// How a notification is styled and how long it stays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Generation; later notifications have larger ids
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

/// Shows notifications on a page and schedules their dismissal
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

struct NotifierInner {
    page: Arc<dyn Page>,
    current: Mutex<Option<Notification>>,
    next_id: AtomicU64,
    info_timeout: Duration,
    timeout: Duration,
}

impl Notifier {
    pub fn new(page: Arc<dyn Page>, config: &NotificationConfig) -> Self {
        Self {
            inner: Arc::new(NotifierInner {
                page,
                current: Mutex::new(None),
                next_id: AtomicU64::new(1),
                info_timeout: Duration::from_millis(config.info_timeout_ms),
                timeout: Duration::from_millis(config.timeout_ms),
            }),
        }
    }

    /// Display time for a severity
    pub fn timeout_for(&self, severity: Severity) -> Duration {
        match severity {
            Severity::Info => self.inner.info_timeout,
            _ => self.inner.timeout,
        }
    }

    /// Replace the current notification and schedule its dismissal.
    ///
    /// Must be called from within a tokio runtime. Returns the new
    /// notification's id.
    pub async fn show(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let notification = Notification {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            message: message.into(),
            severity,
        };
        let id = notification.id;

        match severity {
            Severity::Error => tracing::warn!(id, "{}", notification.message),
            _ => tracing::info!(id, severity = %severity, "{}", notification.message),
        }

        {
            let mut current = self.inner.current.lock().await;
            self.inner.page.show_notification(Some(&notification));
            *current = Some(notification);
        }

        let delay = self.timeout_for(severity);
        let notifier = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            notifier.dismiss(id).await;
        });

        id
    }

    pub async fn info(&self, message: impl Into<String>) -> u64 {
        self.show(message, Severity::Info).await
    }

    pub async fn success(&self, message: impl Into<String>) -> u64 {
        self.show(message, Severity::Success).await
    }

    pub async fn warning(&self, message: impl Into<String>) -> u64 {
        self.show(message, Severity::Warning).await
    }

    pub async fn error(&self, message: impl Into<String>) -> u64 {
        self.show(message, Severity::Error).await
    }

    /// Hide notification `id` if it is still the one on screen
    pub async fn dismiss(&self, id: u64) {
        let mut current = self.inner.current.lock().await;
        if current.as_ref().map(|n| n.id) == Some(id) {
            *current = None;
            self.inner.page.show_notification(None);
        }
    }

    /// The notification on screen, if any
    pub async fn current(&self) -> Option<Notification> {
        self.inner.current.lock().await.clone()
    }
}
