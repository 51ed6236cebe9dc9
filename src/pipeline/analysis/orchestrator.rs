use std::time::Instant;

use super::parser::parse_analysis_response;
use super::prompt::build_analysis_prompt;
use super::types::LlmClient;
use super::AnalysisError;
use crate::models::AnalysisResult;

/// Runs one transcript through the model:
/// validate → prompt → LLM → parse → result
///
/// Blocking. Call from `spawn_blocking` when the client does network I/O.
pub struct MeetingAnalyzer {
    llm: Box<dyn LlmClient>,
}

impl MeetingAnalyzer {
    pub fn new(llm: Box<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Analyse `transcript` against the named playbooks.
    ///
    /// Input is validated before any request goes out. No retry.
    pub fn analyze(
        &self,
        transcript: &str,
        playbook_names: &[String],
    ) -> Result<AnalysisResult, AnalysisError> {
        if transcript.trim().is_empty() {
            return Err(AnalysisError::Validation(
                "Upload a meeting transcript before analysing".into(),
            ));
        }
        if playbook_names.is_empty() {
            return Err(AnalysisError::Validation(
                "Upload at least one playbook before analysing".into(),
            ));
        }

        let prompt = build_analysis_prompt(transcript, playbook_names);
        let started = Instant::now();

        let generated = self.llm.generate(&prompt).inspect_err(|e| {
            tracing::warn!(model = %self.model_name(), error = %e, "Analysis request failed");
        })?;

        let result = parse_analysis_response(&generated).inspect_err(|e| {
            tracing::warn!(
                model = %self.model_name(),
                error = %e,
                response_chars = generated.len(),
                "Could not parse analysis response"
            );
        })?;

        tracing::info!(
            model = %self.model_name(),
            overall_score = result.overall_score(),
            feedback_items = result.feedback.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis complete"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::pipeline::analysis::MockLlmClient;

    const VALID_RESPONSE: &str = r#"```json
{
  "meetingType": "Consulting",
  "objective": "Review catalogue performance",
  "duration": "30 minutes",
  "metrics": {
    "Technical Knowledge": 70,
    "Rapport": 85,
    "Marketplace Strategy": 55,
    "Clear Communication": 90,
    "Problem Solving": 64
  },
  "feedback": [
    {
      "category": "Strategy",
      "issue": "No pricing benchmark shared",
      "suggestion": "Use the pricing section of the marketplace playbook",
      "timestamp": "00:12:00",
      "severity": "warning"
    }
  ]
}
```"#;

    /// Shares its call counter with the test after being boxed.
    struct SharedMock(Arc<MockLlmClient>);

    impl LlmClient for SharedMock {
        fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
            self.0.generate(prompt)
        }

        fn model_name(&self) -> &str {
            self.0.model_name()
        }
    }

    fn analyzer_with(response: &str) -> (MeetingAnalyzer, Arc<MockLlmClient>) {
        let mock = Arc::new(MockLlmClient::new(response));
        (
            MeetingAnalyzer::new(Box::new(SharedMock(Arc::clone(&mock)))),
            mock,
        )
    }

    fn playbooks() -> Vec<String> {
        vec!["marketplace.pdf".into()]
    }

    struct FailingClient;

    impl LlmClient for FailingClient {
        fn generate(&self, _prompt: &str) -> Result<String, AnalysisError> {
            Err(AnalysisError::Transport {
                status: 500,
                body: "INTERNAL: boom".into(),
            })
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn analyze_returns_parsed_result() {
        let (analyzer, mock) = analyzer_with(VALID_RESPONSE);
        let result = analyzer.analyze("Rep: hello", &playbooks()).unwrap();
        assert_eq!(result.meeting_type, "Consulting");
        // (70 + 85 + 55 + 90 + 64) / 5 = 72.8
        assert_eq!(result.overall_score(), 73);
        assert_eq!(result.feedback.len(), 1);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn empty_transcript_fails_without_request() {
        let (analyzer, mock) = analyzer_with(VALID_RESPONSE);
        let err = analyzer.analyze("   \n", &playbooks()).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn no_playbooks_fails_without_request() {
        let (analyzer, mock) = analyzer_with(VALID_RESPONSE);
        let err = analyzer.analyze("Rep: hello", &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn malformed_response_is_not_retried() {
        let (analyzer, mock) = analyzer_with("Sorry, I can't help with that.");
        let err = analyzer.analyze("Rep: hello", &playbooks()).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn transport_error_propagates() {
        let analyzer = MeetingAnalyzer::new(Box::new(FailingClient));
        let err = analyzer.analyze("Rep: hello", &playbooks()).unwrap_err();
        assert!(matches!(err, AnalysisError::Transport { status: 500, .. }));
    }

    #[test]
    fn model_name_comes_from_client() {
        let (analyzer, _) = analyzer_with(VALID_RESPONSE);
        assert_eq!(analyzer.model_name(), "mock");
    }
}
