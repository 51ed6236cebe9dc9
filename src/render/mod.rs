//! Server-side rendering of the dashboard: SVG chart, feedback list and
//! the self-contained HTML pages that embed them.

pub mod chart;
pub mod feedback;
pub mod page;

pub use chart::{render_chart_svg, render_legend, ChartGeometry, ChartPoint};
pub use feedback::render_feedback_list;
pub use page::{
    render_analyze_page, render_dashboard_page, render_playbooks_page, Notice, NoticeKind,
};

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
