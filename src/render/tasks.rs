//! Tasks table
//!
//! Each row carries exactly one status-dependent action cell. Statuses the
//! client does not recognize fall through to the waiting indicator.

use super::{badge_class, escape, placeholder, Markup};
use crate::model::{StatusFilter, Task, TaskStatus};
use crate::validate::{format_timestamp, task_type_icon};

/// Action cell shown for a task row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// View / CSV / JSON buttons
    Results,
    /// Progress indicator
    Progress,
    /// Failure indicator
    Failure,
    /// Waiting indicator
    Waiting,
}

impl RowAction {
    pub fn for_status(status: &TaskStatus) -> Self {
        match status {
            TaskStatus::Completed => RowAction::Results,
            TaskStatus::Running => RowAction::Progress,
            TaskStatus::Failed => RowAction::Failure,
            TaskStatus::Pending | TaskStatus::Other(_) => RowAction::Waiting,
        }
    }

    fn render(&self, task_id: i64) -> String {
        match self {
            RowAction::Results => format!(
                r#"<button class="action-btn action-view" data-action="view" data-task-id="{id}">📊 View</button><button class="action-btn action-csv" data-action="export-csv" data-task-id="{id}">📥 CSV</button><button class="action-btn action-json" data-action="export-json" data-task-id="{id}">💾 JSON</button>"#,
                id = task_id
            ),
            RowAction::Progress => r#"<span class="status-running">⏳ Running...</span>"#.to_string(),
            RowAction::Failure => r#"<span class="status-failed">❌ Failed</span>"#.to_string(),
            RowAction::Waiting => r#"<span class="status-pending">⏸️ Pending</span>"#.to_string(),
        }
    }
}

/// Loading placeholder shown while the task list is in flight
pub fn render_tasks_loading() -> Markup {
    Markup::new(r#"<div class="loading">Loading tasks...</div>"#)
}

/// Error placeholder replacing the task list after a failed load
pub fn render_tasks_error() -> Markup {
    placeholder("empty-state error", "❌", &["Error loading tasks"])
}

/// Render the tasks table for the given filter, or the empty-state placeholder
pub fn render_tasks(tasks: &[Task], filter: StatusFilter) -> Markup {
    if tasks.is_empty() {
        let headline = match filter.status() {
            Some(status) => format!("No tasks found with status \"{}\".", status),
            None => "No tasks found.".to_string(),
        };
        return placeholder(
            "empty-state",
            "📋",
            &[&headline, "Create your first scraping task to get started!"],
        );
    }

    let mut html = String::from(
        "<table><thead><tr>\
         <th>ID</th><th>Type</th><th>Target</th>\
         <th>Status</th><th>Created</th><th>Actions</th>\
         </tr></thead><tbody>",
    );

    for task in tasks {
        html.push_str(&render_row(task));
    }

    html.push_str("</tbody></table>");
    Markup::new(html)
}

fn render_row(task: &Task) -> String {
    let created = format_timestamp(Some(&task.created_at));
    let action = RowAction::for_status(&task.status);

    format!(
        r#"<tr data-task-id="{id}"><td><strong>#{id}</strong></td><td><span class="badge badge-info">{icon} {task_type}</span></td><td><strong>{target}</strong></td><td><span class="{badge}">{status}</span></td><td>{created}</td><td>{actions}</td></tr>"#,
        id = task.id,
        icon = task_type_icon(&task.task_type),
        task_type = escape(task.task_type.as_str()),
        target = escape(&task.target),
        badge = badge_class(task.status.as_str()),
        status = escape(task.status.as_str()),
        created = escape(&created),
        actions = action.render(task.id),
    )
}
