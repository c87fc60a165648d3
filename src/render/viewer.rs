//! Task data viewer
//!
//! Secondary view for a completed task's scraped payload, opened in its own
//! window. It consumes the same JSON the API client already fetched.

use chrono::Local;
use serde_json::Value;

use super::{escape, Markup};
use crate::api::ApiClientPaths;
use crate::model::ExportFormat;

/// Number of items in a payload: array length, otherwise 1
pub fn item_count(data: &Value) -> usize {
    match data {
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

/// Render the stand-alone viewer document for a task payload
pub fn render_task_data(task_id: i64, data: &Value, paths: &ApiClientPaths) -> Markup {
    let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
    let retrieved = Local::now().format("%b %-d, %Y %H:%M:%S");

    Markup::new(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Task #{id} - Scraped Data</title>
</head>
<body>
<div class="container">
<h1>🎯 Task #{id} - Scraped Data</h1>
<div class="info"><strong>Items Count:</strong> {count}<br><strong>Retrieved:</strong> {retrieved}</div>
<div class="actions">
<a class="btn btn-success" href="{csv}">📊 Download CSV</a>
<a class="btn btn-secondary" href="{json}">💾 Download JSON</a>
<button class="btn btn-primary" onclick="copyToClipboard()">📋 Copy to Clipboard</button>
</div>
<pre id="json-data">{pretty}</pre>
</div>
<script>
function copyToClipboard() {{
  const text = document.getElementById('json-data').textContent;
  navigator.clipboard.writeText(text)
    .then(() => alert('✅ Copied to clipboard!'))
    .catch(err => alert('❌ Failed to copy: ' + err));
}}
</script>
</body>
</html>
"#,
        id = task_id,
        count = item_count(data),
        retrieved = retrieved,
        csv = escape(&paths.export_url(task_id, ExportFormat::Csv)),
        json = escape(&paths.export_url(task_id, ExportFormat::Json)),
        pretty = escape(&pretty),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_count() {
        assert_eq!(item_count(&json!([1, 2, 3])), 3);
        assert_eq!(item_count(&json!({"username": "bob"})), 1);
    }

    #[test]
    fn test_viewer_document() {
        let paths = ApiClientPaths::new("http://backend:5000");
        let data = json!([{"caption": "<hello>"}, {"caption": "world"}]);
        let markup = render_task_data(12, &data, &paths);

        assert!(markup.contains("<title>Task #12 - Scraped Data</title>"));
        assert!(markup.contains("<strong>Items Count:</strong> 2"));
        assert!(markup.contains(r#"href="http://backend:5000/api/tasks/12/export/csv""#));
        assert!(markup.contains(r#"href="http://backend:5000/api/tasks/12/export/json""#));
        assert!(markup.contains("&lt;hello&gt;"));
    }

    #[test]
    fn test_viewer_copies_escaped_payload_text() {
        let paths = ApiClientPaths::new("http://backend:5000");
        let markup = render_task_data(3, &json!({"bio": "</script>"}), &paths);

        assert!(markup.contains(r#"onclick="copyToClipboard()">📋 Copy to Clipboard</button>"#));
        assert!(markup.contains("getElementById('json-data').textContent"));
        // The payload only appears escaped inside <pre>, never in the script
        assert_eq!(markup.as_str().matches("</script>").count(), 1);
        assert!(markup.contains("&lt;/script&gt;"));
    }
}
