use super::AnalysisError;

/// Generative model client abstraction (allows mocking).
pub trait LlmClient: Send + Sync {
    /// Send `prompt` and return the generated text, unparsed.
    fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;

    fn model_name(&self) -> &str;
}
