//! Accounts table

use super::{badge_class, escape, placeholder, Markup};
use crate::model::Account;
use crate::validate::format_timestamp;

/// Loading placeholder shown while the account list is in flight
pub fn render_accounts_loading() -> Markup {
    Markup::new(r#"<div class="loading">Loading accounts...</div>"#)
}

/// Error placeholder replacing the account list after a failed load
pub fn render_accounts_error() -> Markup {
    placeholder("empty-state error", "❌", &["Error loading accounts"])
}

/// Render the accounts table, or the empty-state placeholder
pub fn render_accounts(accounts: &[Account]) -> Markup {
    if accounts.is_empty() {
        return placeholder(
            "empty-state",
            "📭",
            &[
                "No accounts added yet.",
                "Add your first account above to start scraping!",
            ],
        );
    }

    let mut html = String::from(
        "<table><thead><tr>\
         <th>ID</th><th>Username</th><th>Status</th>\
         <th>Tasks Completed</th><th>Last Used</th><th>Active</th>\
         </tr></thead><tbody>",
    );

    for account in accounts {
        html.push_str(&render_row(account));
    }

    html.push_str("</tbody></table>");
    Markup::new(html)
}

fn render_row(account: &Account) -> String {
    let last_used = format_timestamp(account.last_used.as_deref());

    format!(
        r#"<tr><td>#{}</td><td><strong>@{}</strong></td><td><span class="{}">{}</span></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
        account.id,
        escape(&account.username),
        badge_class(&account.status),
        escape(&account.status),
        account.tasks_completed,
        escape(&last_used),
        if account.is_active { "✅" } else { "❌" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: i64, username: &str, status: &str) -> Account {
        Account {
            id,
            username: username.to_string(),
            status: status.to_string(),
            tasks_completed: 2,
            last_used: None,
            is_active: true,
        }
    }

    #[test]
    fn test_empty_accounts_renders_placeholder() {
        let markup = render_accounts(&[]);
        assert!(markup.contains("empty-state"));
        assert!(markup.contains("No accounts added yet."));
        assert!(!markup.contains("<table>"));
    }

    #[test]
    fn test_accounts_table_keeps_backend_order() {
        let markup = render_accounts(&[account(9, "zed", "active"), account(1, "amy", "banned")]);
        let html = markup.as_str();

        assert!(html.contains("<table>"));
        let zed = html.find("@zed").unwrap();
        let amy = html.find("@amy").unwrap();
        assert!(zed < amy);
        assert!(html.contains(r#"<span class="badge badge-banned">banned</span>"#));
        assert!(html.contains("Never"));
    }

    #[test]
    fn test_unrecognized_status_still_renders() {
        let markup = render_accounts(&[account(1, "amy", "on cooldown")]);
        assert!(markup.contains(r#"<span class="badge badge-unknown">on cooldown</span>"#));
    }

    #[test]
    fn test_username_escaped() {
        let markup = render_accounts(&[account(1, "<b>amy</b>", "active")]);
        assert!(markup.contains("@&lt;b&gt;amy&lt;/b&gt;"));
    }
}
