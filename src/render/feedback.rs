use std::fmt::Write;

use super::escape_html;
use crate::models::FeedbackEntry;

const EMPTY_STATE: &str = r#"<div class="empty-state"><svg width="48" height="48" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M14 9V5a3 3 0 0 0-3-3l-4 9v11h11.28a2 2 0 0 0 2-1.7l1.38-9a2 2 0 0 0-2-2.3zM7 22H4a2 2 0 0 1-2-2v-7a2 2 0 0 1 2-2h3"/></svg><p>Excellent! No critical improvement points identified.</p></div>"#;

/// Render feedback entries in the order given.
///
/// An empty slice renders a single empty-state block instead.
pub fn render_feedback_list(entries: &[FeedbackEntry]) -> String {
    let mut html = String::from(r#"<div class="feedback-list">"#);

    if entries.is_empty() {
        html.push_str(EMPTY_STATE);
    }

    for entry in entries {
        let _ = write!(
            html,
            r#"<div class="feedback-item {severity}"><div class="feedback-header"><span class="feedback-timestamp">{timestamp}</span><span class="feedback-category">{category}</span></div><div class="feedback-issue">{issue}</div><div class="feedback-suggestion">💡 {suggestion}</div></div>"#,
            severity = entry.severity.as_str(),
            timestamp = escape_html(&entry.timestamp),
            category = escape_html(&entry.category),
            issue = escape_html(&entry.issue),
            suggestion = escape_html(&entry.suggestion),
        );
    }

    html.push_str("</div>");
    html
}
