use std::fmt::Write;

use super::chart::{render_chart_svg, render_legend};
use super::escape_html;
use super::feedback::render_feedback_list;
use crate::config::{ChartSettings, APP_NAME, APP_VERSION};
use crate::models::{AnalysisResult, Playbook};

/// Top-level navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Playbooks,
    Analyze,
}

impl View {
    const ALL: [View; 3] = [View::Dashboard, View::Playbooks, View::Analyze];

    fn href(&self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Playbooks => "/playbooks",
            Self::Analyze => "/analyze",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Playbooks => "Playbooks",
            Self::Analyze => "Analyze",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Banner shown above the page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    fn render(&self) -> String {
        let (class, role) = match self.kind {
            NoticeKind::Info => ("notice notice-info", "status"),
            NoticeKind::Error => ("notice notice-error", "alert"),
        };
        format!(
            r#"<div class="{class}" role="{role}">{}</div>"#,
            escape_html(&self.message)
        )
    }
}

// ═══════════════════════════════════════════════════════════
// HTML rendering: self-contained pages (no external deps)
// ═══════════════════════════════════════════════════════════

fn layout(active: View, notice: Option<&Notice>, content: &str) -> String {
    let mut nav = String::new();
    for view in View::ALL {
        let class = if view == active { "nav-link active" } else { "nav-link" };
        let _ = write!(
            nav,
            r#"<a class="{class}" href="{}">{}</a>"#,
            view.href(),
            view.title()
        );
    }
    let notice = notice.map(Notice::render).unwrap_or_default();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · {APP_NAME}</title>
<style>
*,*::before,*::after{{box-sizing:border-box}}
body{{margin:0;font-family:Inter,-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#14141f;color:#e4e4f0;min-height:100vh}}
header{{display:flex;align-items:center;gap:24px;padding:16px 32px;background:#1e1e30;border-bottom:1px solid rgba(255,255,255,.06)}}
.brand{{font-weight:700;font-size:1.1rem;color:#fff}}
.nav-link{{color:#a0a0b8;text-decoration:none;padding:8px 12px;border-radius:8px}}
.nav-link.active{{background:rgba(99,102,241,.15);color:#fff}}
main{{max-width:960px;margin:0 auto;padding:32px}}
h1{{font-size:1.5rem;margin:0 0 8px}}
.card{{background:#1e1e30;border-radius:16px;padding:24px;margin-bottom:24px;box-shadow:0 4px 24px rgba(0,0,0,.25)}}
.meeting-info{{color:#a0a0b8;margin:0 0 24px}}
.performance-chart{{width:100%;height:auto;display:block}}
.chart-legend{{display:flex;flex-wrap:wrap;gap:12px 24px;margin-top:16px}}
.legend-item{{display:flex;align-items:center;gap:8px;font-size:.875rem}}
.legend-color{{width:12px;height:12px;border-radius:3px}}
.legend-label{{color:#a0a0b8}}
.legend-value{{font-weight:600}}
.feedback-list{{display:flex;flex-direction:column;gap:12px}}
.feedback-item{{border-left:4px solid #f59e0b;background:rgba(245,158,11,.08);border-radius:8px;padding:16px}}
.feedback-item.critical{{border-left-color:#ef4444;background:rgba(239,68,68,.08)}}
.feedback-header{{display:flex;gap:12px;font-size:.8rem;color:#a0a0b8;margin-bottom:8px}}
.feedback-category{{font-weight:600;color:#e4e4f0}}
.feedback-issue{{margin-bottom:8px}}
.feedback-suggestion{{color:#c7c7dd;font-size:.9rem}}
.empty-state{{text-align:center;color:#6b6b85;padding:32px}}
.notice{{border-radius:12px;padding:16px;margin-bottom:24px}}
.notice-info{{background:rgba(16,185,129,.12);border:1px solid rgba(16,185,129,.4)}}
.notice-error{{background:rgba(239,68,68,.12);border:1px solid rgba(239,68,68,.4)}}
.playbook-list{{list-style:none;margin:0;padding:0}}
.playbook-item{{display:flex;align-items:center;justify-content:space-between;padding:12px 0;border-bottom:1px solid rgba(255,255,255,.06)}}
.playbook-size{{color:#6b6b85;font-size:.85rem;margin-left:8px}}
textarea{{width:100%;min-height:240px;background:#14141f;color:#e4e4f0;border:1px solid rgba(255,255,255,.1);border-radius:8px;padding:12px;font:inherit}}
.btn{{display:inline-block;padding:10px 18px;border:none;border-radius:10px;font-weight:600;cursor:pointer;background:#6366f1;color:#fff;text-decoration:none}}
.btn-danger{{background:transparent;color:#ef4444;padding:6px 10px}}
.hint{{color:#6b6b85;font-size:.85rem}}
footer{{text-align:center;color:#6b6b85;font-size:.75rem;padding:24px}}
</style>
</head>
<body>
<header><span class="brand">{APP_NAME}</span><nav>{nav}</nav></header>
<main>
{notice}
{content}
</main>
<footer>{APP_NAME} v{APP_VERSION}</footer>
</body>
</html>"##,
        title = active.title(),
    )
}

/// `GET /`: the latest analysis, or a prompt to run one.
pub fn render_dashboard_page(analysis: Option<&AnalysisResult>, chart: ChartSettings) -> String {
    let content = match analysis {
        Some(result) => format!(
            r#"<h1>Meeting performance</h1>
<p id="meeting-info" class="meeting-info">{info}</p>
<section class="card">
{svg}
{legend}
</section>
<section class="card">
<h2>Improvement points</h2>
{feedback}
</section>
<p class="hint">Duration: {duration} · Analysed {analyzed_at}</p>"#,
            info = escape_html(&result.summary_line()),
            svg = render_chart_svg(&result.metrics, chart),
            legend = render_legend(&result.metrics),
            feedback = render_feedback_list(&result.feedback),
            duration = escape_html(&result.duration),
            analyzed_at = result.analyzed_at.format("%Y-%m-%d %H:%M UTC"),
        ),
        None => r#"<section class="card empty-state">
<h1>No analysis yet</h1>
<p>Upload your playbooks, add a meeting transcript and run an analysis to see your scores here.</p>
<a class="btn" href="/analyze">Analyze a meeting</a>
</section>"#
            .to_string(),
    };

    layout(View::Dashboard, None, &content)
}

/// `GET /playbooks`: upload form and the current playbook list.
pub fn render_playbooks_page(playbooks: &[Playbook], notice: Option<&Notice>) -> String {
    let list = if playbooks.is_empty() {
        r#"<p class="hint">No playbooks uploaded yet.</p>"#.to_string()
    } else {
        let mut items = String::from(r#"<ul class="playbook-list">"#);
        for playbook in playbooks {
            let _ = write!(
                items,
                r#"<li class="playbook-item"><span><span class="playbook-name">{name}</span><span class="playbook-size">{size}</span></span><form method="post" action="/playbooks/{id}/delete"><button class="btn btn-danger" type="submit">Delete</button></form></li>"#,
                name = escape_html(&playbook.name),
                size = escape_html(&playbook.size),
                id = playbook.id,
            );
        }
        items.push_str("</ul>");
        items
    };

    let content = format!(
        r#"<h1>Playbooks</h1>
<section class="card">
<form method="post" action="/playbooks" enctype="multipart/form-data">
<input type="file" name="files" accept=".pdf,application/pdf" multiple required>
<button class="btn" type="submit">Upload</button>
</form>
<p class="hint">PDF files only. Playbook names are shared with the model as analysis context.</p>
</section>
<section class="card">
{list}
</section>"#
    );

    layout(View::Playbooks, notice, &content)
}

/// `GET /analyze`: transcript upload and the analysis form.
pub fn render_analyze_page(
    transcript: &str,
    playbook_count: usize,
    notice: Option<&Notice>,
) -> String {
    let playbook_hint = match playbook_count {
        0 => r#"No playbooks uploaded. <a href="/playbooks">Add one</a> before analysing."#
            .to_string(),
        1 => "1 playbook will be used as context.".to_string(),
        n => format!("{n} playbooks will be used as context."),
    };

    let content = format!(
        r#"<h1>Analyze a meeting</h1>
<section class="card">
<form method="post" action="/transcript" enctype="multipart/form-data">
<input type="file" name="file" accept=".txt,text/plain" required>
<button class="btn" type="submit">Load transcript file</button>
</form>
</section>
<section class="card">
<form method="post" action="/analyze">
<textarea name="transcript" placeholder="Paste the meeting transcript here">
{transcript}</textarea>
<p class="hint">{playbook_hint}</p>
<button class="btn" type="submit">Analyze meeting</button>
</form>
</section>"#,
        transcript = escape_html(transcript),
    );

    layout(View::Analyze, notice, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedbackEntry, MetricScores, Severity};

    fn sample_analysis(feedback: Vec<FeedbackEntry>) -> AnalysisResult {
        AnalysisResult::new(
            "Sales".into(),
            "Close <Q3> deal".into(),
            "40 minutes".into(),
            MetricScores::new([80, 60, 90, 70, 100]).unwrap(),
            feedback,
        )
    }

    #[test]
    fn dashboard_shows_meeting_info_chart_and_feedback() {
        let result = sample_analysis(vec![FeedbackEntry {
            category: "Closing".into(),
            issue: "No next step".into(),
            suggestion: "Book a follow-up".into(),
            timestamp: "00:39:00".into(),
            severity: Severity::Critical,
        }]);
        let html = render_dashboard_page(Some(&result), ChartSettings::default());
        assert!(html.contains("Sales • Close &lt;Q3&gt; deal • Score: 80/100"));
        assert!(html.contains("<svg"));
        assert!(html.contains("chart-legend"));
        assert!(html.contains("feedback-item critical"));
        assert!(html.contains("40 minutes"));
    }

    #[test]
    fn dashboard_with_empty_feedback_shows_single_empty_state_in_list() {
        let result = sample_analysis(vec![]);
        let html = render_dashboard_page(Some(&result), ChartSettings::default());
        assert_eq!(html.matches(r#"<div class="empty-state">"#).count(), 1);
        assert!(!html.contains(r#"class="feedback-item "#));
    }

    #[test]
    fn dashboard_without_analysis_prompts_for_one() {
        let html = render_dashboard_page(None, ChartSettings::default());
        assert!(html.contains("No analysis yet"));
        assert!(html.contains(r#"href="/analyze""#));
        assert!(!html.contains("<svg xmlns"));
    }

    #[test]
    fn active_view_is_highlighted() {
        let html = render_playbooks_page(&[], None);
        assert!(html.contains(r#"<a class="nav-link active" href="/playbooks">Playbooks</a>"#));
        assert!(html.contains(r#"<a class="nav-link" href="/">Dashboard</a>"#));
    }

    #[test]
    fn playbooks_page_lists_with_delete_forms() {
        let pb = Playbook::new("discovery <v2>.pdf", vec![0u8; 1536]);
        let html = render_playbooks_page(std::slice::from_ref(&pb), None);
        assert!(html.contains("discovery &lt;v2&gt;.pdf"));
        assert!(html.contains("1.5 KB"));
        assert!(html.contains(&format!(r#"action="/playbooks/{}/delete""#, pb.id)));
    }

    #[test]
    fn playbooks_page_empty_hint() {
        let html = render_playbooks_page(&[], None);
        assert!(html.contains("No playbooks uploaded yet."));
    }

    #[test]
    fn analyze_page_prefills_escaped_transcript() {
        let html = render_analyze_page("Rep: </textarea><b>hi</b>", 2, None);
        assert!(html.contains("Rep: &lt;/textarea&gt;&lt;b&gt;hi&lt;/b&gt;"));
        assert!(html.contains("2 playbooks will be used as context."));
    }

    #[test]
    fn analyze_page_keeps_leading_newline() {
        // HTML parsers drop the first newline after <textarea>
        let html = render_analyze_page("\nRep: hello", 1, None);
        assert!(html.contains("here\">\n\nRep: hello</textarea>"));

        let html = render_analyze_page("Rep: hello", 1, None);
        assert!(html.contains("here\">\nRep: hello</textarea>"));
    }

    #[test]
    fn analyze_page_warns_without_playbooks() {
        let html = render_analyze_page("", 0, None);
        assert!(html.contains("No playbooks uploaded."));
    }

    #[test]
    fn error_notice_is_rendered_as_alert() {
        let notice = Notice::error("Gemini is unreachable: timed out");
        let html = render_analyze_page("", 1, Some(&notice));
        assert!(html.contains(r#"<div class="notice notice-error" role="alert">Gemini is unreachable: timed out</div>"#));
    }
}
