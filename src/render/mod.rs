//! View rendering
//!
//! Stateless functions turning entity snapshots into replacement markup for a
//! single screen region. Every render replaces the region wholesale.
//!
//! - [`stats`]: counter cards
//! - [`accounts`]: accounts table
//! - [`tasks`]: tasks table with per-status actions
//! - [`viewer`]: stand-alone task data document
//! - [`layout`]: full page composition for native hosts

pub mod accounts;
pub mod layout;
pub mod stats;
pub mod tasks;
pub mod viewer;

use std::borrow::Cow;
use std::fmt;

pub use accounts::{render_accounts, render_accounts_error, render_accounts_loading};
pub use layout::render_document;
pub use stats::render_stats;
pub use tasks::{render_tasks, render_tasks_error, render_tasks_loading, RowAction};
pub use viewer::render_task_data;

/// A rendered HTML fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if the fragment contains the given text
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Screen regions the controller replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Stats,
    Accounts,
    Tasks,
}

impl Region {
    /// DOM id of the region container
    pub fn element_id(&self) -> &'static str {
        match self {
            Region::Stats => "stats",
            Region::Accounts => "accounts-list",
            Region::Tasks => "tasks-list",
        }
    }
}

/// Escape text for interpolation into HTML content or attribute values
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// CSS class suffix derived from a status label.
///
/// Anything outside `[a-z0-9_-]` collapses to the generic `unknown` style.
pub(crate) fn badge_class(status: &str) -> String {
    let lower = status.trim().to_lowercase();
    let valid = !lower.is_empty()
        && lower
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');

    if valid {
        format!("badge badge-{}", lower)
    } else {
        "badge badge-unknown".to_string()
    }
}

/// Placeholder shown instead of a table
pub(crate) fn placeholder(class: &str, icon: &str, lines: &[&str]) -> Markup {
    let body = lines
        .iter()
        .map(|line| escape(line).into_owned())
        .collect::<Vec<_>>()
        .join("<br>");
    Markup(format!(
        r#"<div class="{}">{} {}</div>"#,
        class, icon, body
    ))
}
