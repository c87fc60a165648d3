//! Stats counters

use super::Markup;
use crate::model::StatsSnapshot;

/// Render the four counter cards
pub fn render_stats(stats: &StatsSnapshot) -> Markup {
    let cards = [
        ("total-accounts", "Total Accounts", stats.total_accounts),
        ("active-accounts", "Active Accounts", stats.active_accounts),
        ("completed-tasks", "Completed Tasks", stats.completed_tasks),
        ("running-tasks", "Running Tasks", stats.running_tasks),
    ];

    let mut html = String::from(r#"<div class="stats-grid">"#);
    for (id, label, value) in cards {
        html.push_str(&format!(
            r#"<div class="stat-card"><div class="stat-value" id="{}">{}</div><div class="stat-label">{}</div></div>"#,
            id, value, label
        ));
    }
    html.push_str("</div>");

    Markup::new(html)
}
