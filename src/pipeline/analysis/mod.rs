pub mod types;
pub mod prompt;
pub mod parser;
pub mod gemini;
pub mod orchestrator;

pub use types::*;
pub use prompt::*;
pub use parser::*;
pub use gemini::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{0}")]
    Validation(String),

    #[error("Gemini returned error (status {status}): {body}")]
    Transport { status: u16, body: String },

    #[error("Gemini is unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("Malformed Gemini response: {0}")]
    MalformedResponse(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
