use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The only MIME type accepted for playbooks.
pub const PLAYBOOK_MIME: &str = "application/pdf";

const PDF_MAGIC: &[u8] = b"%PDF-";

/// An uploaded reference document. Only the name informs the analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Playbook {
    pub id: Uuid,
    pub name: String,
    /// Human-readable size, e.g. `"1.5 KB"`.
    pub size: String,
    pub size_bytes: u64,
    #[serde(skip)]
    pub content: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

impl Playbook {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        let size_bytes = content.len() as u64;
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            size: format_file_size(size_bytes),
            size_bytes,
            content,
            uploaded_at: Utc::now(),
        }
    }
}

/// Format a byte count with binary units and at most two decimals.
///
/// `0` → `"0 Bytes"`, `1536` → `"1.5 KB"`, `1048576` → `"1 MB"`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit < UNITS.len() - 1 && bytes >= divisor * 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let value = (bytes as f64 / divisor as f64 * 100.0).round() / 100.0;
    format!("{value} {}", UNITS[unit])
}

/// Decide whether an uploaded file is a PDF playbook.
///
/// A declared `application/pdf` type is trusted. Otherwise the file name must
/// guess to PDF and the bytes must start with the PDF magic.
pub fn is_pdf_upload(content_type: Option<&str>, file_name: &str, bytes: &[u8]) -> bool {
    if let Some(ct) = content_type {
        if ct.eq_ignore_ascii_case(PLAYBOOK_MIME) {
            return true;
        }
    }

    let guessed_pdf = mime_guess::from_path(file_name)
        .first()
        .map(|m| m.essence_str() == PLAYBOOK_MIME)
        .unwrap_or(false);

    guessed_pdf && bytes.starts_with(PDF_MAGIC)
}
