//! Full page composition
//!
//! Assembles the regions, tab bar, filter bar and notification slot of a
//! [`PageSnapshot`] into one stand-alone document. Used by native hosts that
//! write the dashboard to disk instead of patching a live DOM.

use super::{escape, Markup, Region};
use crate::model::{StatusFilter, Tab, TaskType};
use crate::page::PageSnapshot;
use crate::validate::{task_type_icon, DEFAULT_MAX_ITEMS};

const STYLE: &str = "body{font-family:sans-serif;margin:0;padding:20px;background:#f5f5f5}\
.stats-grid{display:grid;grid-template-columns:repeat(4,1fr);gap:16px}\
.stat-card{background:#fff;padding:16px;border-radius:8px}\
.stat-value{font-size:2em;font-weight:bold}\
.tab-btn.active,.filter-btn.active{background:#667eea;color:#fff}\
.tab-content{display:none}.tab-content.active{display:block}\
.notification{position:fixed;top:20px;right:20px;padding:12px 20px;border-radius:6px}\
.notification.success{background:#d4edda}.notification.error{background:#f8d7da}\
.notification.warning{background:#fff3cd}.notification.info{background:#d1ecf1}\
table{width:100%;border-collapse:collapse}td,th{padding:8px;border-bottom:1px solid #eee}\
.empty-state,.loading{text-align:center;padding:40px;color:#666}";

fn tab_label(tab: Tab) -> &'static str {
    match tab {
        Tab::Create => "➕ Create Task",
        Tab::Tasks => "📋 Tasks",
        Tab::Accounts => "👤 Accounts",
    }
}

fn filter_label(filter: StatusFilter) -> &'static str {
    match filter {
        StatusFilter::All => "All",
        StatusFilter::Pending => "Pending",
        StatusFilter::Running => "Running",
        StatusFilter::Completed => "Completed",
        StatusFilter::Failed => "Failed",
    }
}

fn active(is_active: bool) -> &'static str {
    if is_active {
        " active"
    } else {
        ""
    }
}

fn region(snapshot: &PageSnapshot, region: Region) -> String {
    format!(
        r#"<div id="{}">{}</div>"#,
        region.element_id(),
        snapshot.region(region).map(Markup::as_str).unwrap_or("")
    )
}

fn create_forms(snapshot: &PageSnapshot) -> String {
    let options: String = TaskType::known()
        .iter()
        .map(|t| {
            format!(
                r#"<option value="{}">{} {}</option>"#,
                t.as_str(),
                task_type_icon(t),
                t.as_str()
            )
        })
        .collect();
    let max_items = snapshot.task_form_max_items.unwrap_or(DEFAULT_MAX_ITEMS);

    format!(
        r#"<form id="task-form"><select id="task-type" name="task_type">{options}</select><input id="target" name="target" placeholder="username or hashtag"><input id="max-items" name="max_items" type="number" min="1" max="1000" value="{max_items}"><button type="submit">🚀 Start Scraping</button></form><form id="account-form"><input id="username" name="username" placeholder="username"><input id="password" name="password" type="password"><button type="submit">➕ Add Account</button></form>"#
    )
}

/// Compose the whole dashboard page
pub fn render_document(snapshot: &PageSnapshot) -> Markup {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str(r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>Scraper Dashboard</title><style>"#);
    html.push_str(STYLE);
    html.push_str("</style></head><body><h1>📊 Scraper Dashboard</h1>");

    html.push_str(&region(snapshot, Region::Stats));

    html.push_str(r#"<div class="tabs">"#);
    for tab in Tab::all() {
        html.push_str(&format!(
            r#"<button class="tab-btn{}" data-tab="{}">{}</button>"#,
            active(*tab == snapshot.active_tab),
            tab.as_str(),
            tab_label(*tab)
        ));
    }
    html.push_str("</div>");

    for tab in Tab::all() {
        html.push_str(&format!(
            r#"<div class="tab-content{}" id="{}-tab">"#,
            active(*tab == snapshot.active_tab),
            tab.as_str()
        ));
        match tab {
            Tab::Create => html.push_str(&create_forms(snapshot)),
            Tab::Tasks => {
                html.push_str(r#"<div class="filters">"#);
                for filter in StatusFilter::all() {
                    html.push_str(&format!(
                        r#"<button class="filter-btn{}" data-status="{}">{}</button>"#,
                        active(*filter == snapshot.active_filter),
                        filter.as_str(),
                        filter_label(*filter)
                    ));
                }
                html.push_str("</div>");
                html.push_str(&region(snapshot, Region::Tasks));
            }
            Tab::Accounts => html.push_str(&region(snapshot, Region::Accounts)),
        }
        html.push_str("</div>");
    }

    match &snapshot.notification {
        Some(n) => html.push_str(&format!(
            r#"<div id="notification" class="notification {} show">{}</div>"#,
            n.severity,
            escape(&n.message)
        )),
        None => html.push_str(r#"<div id="notification" class="notification"></div>"#),
    }

    html.push_str("</body></html>");
    Markup::new(html)
}
