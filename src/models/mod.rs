pub mod analysis;
pub mod playbook;

pub use analysis::{
    AnalysisResult, FeedbackEntry, InvalidScore, Metric, MetricScores, Severity, MAX_SCORE,
    METRIC_COUNT,
};
pub use playbook::{format_file_size, is_pdf_upload, Playbook, PLAYBOOK_MIME};
