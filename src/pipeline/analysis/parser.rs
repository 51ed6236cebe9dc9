use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::AnalysisError;
use crate::models::{AnalysisResult, FeedbackEntry, Metric, MetricScores, MAX_SCORE, METRIC_COUNT};

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?i:json)?\s*").expect("valid regex"));

/// Remove Markdown code fences (bare or tagged `json`, any case) and trim.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Shape the model is asked to produce.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    meeting_type: String,
    objective: String,
    duration: String,
    metrics: serde_json::Map<String, serde_json::Value>,
    feedback: Vec<FeedbackEntry>,
}

/// Parse generated text into an `AnalysisResult`.
///
/// Any deviation from the expected shape is a `MalformedResponse`; nothing
/// partial is returned.
pub fn parse_analysis_response(generated: &str) -> Result<AnalysisResult, AnalysisError> {
    let json_text = strip_code_fences(generated);
    if json_text.is_empty() {
        return Err(AnalysisError::MalformedResponse("Empty response text".into()));
    }

    let raw: RawAnalysis = serde_json::from_str(&json_text)
        .map_err(|e| AnalysisError::MalformedResponse(format!("Invalid analysis JSON: {e}")))?;

    let metrics = parse_metrics(&raw.metrics)?;

    Ok(AnalysisResult::new(
        raw.meeting_type,
        raw.objective,
        raw.duration,
        metrics,
        raw.feedback,
    ))
}

fn parse_metrics(
    raw: &serde_json::Map<String, serde_json::Value>,
) -> Result<MetricScores, AnalysisError> {
    let mut scores = [0u8; METRIC_COUNT];
    let mut seen = HashSet::new();

    for (key, value) in raw {
        let metric: Metric = key.parse().map_err(AnalysisError::MalformedResponse)?;
        scores[metric.index()] = parse_score(metric, value)?;
        seen.insert(metric);
    }

    if let Some(missing) = Metric::ALL.iter().find(|m| !seen.contains(m)) {
        return Err(AnalysisError::MalformedResponse(format!(
            "missing metric '{missing}'"
        )));
    }

    MetricScores::new(scores).map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
}

fn parse_score(metric: Metric, value: &serde_json::Value) -> Result<u8, AnalysisError> {
    let number = value.as_f64().ok_or_else(|| {
        AnalysisError::MalformedResponse(format!("score for '{metric}' is not a number"))
    })?;
    if number.fract() != 0.0 || !(0.0..=f64::from(MAX_SCORE)).contains(&number) {
        return Err(AnalysisError::MalformedResponse(format!(
            "score {number} for '{metric}' is not an integer in 0-100"
        )));
    }
    Ok(number as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn sample_json() -> String {
        r#"{
  "meetingType": "Sales",
  "objective": "Present the marketplace integration",
  "duration": "45 minutes",
  "metrics": {
    "Technical Knowledge": 80,
    "Rapport": 60,
    "Marketplace Strategy": 90,
    "Clear Communication": 70,
    "Problem Solving": 100
  },
  "feedback": [
    {
      "category": "Discovery",
      "issue": "Skipped budget questions",
      "suggestion": "Follow the discovery playbook checklist",
      "timestamp": "00:05:10",
      "severity": "warning"
    },
    {
      "category": "Closing",
      "issue": "No next step agreed",
      "suggestion": "Propose a follow-up date before ending",
      "timestamp": "00:42:00",
      "severity": "critical"
    }
  ]
}"#
        .to_string()
    }

    #[test]
    fn strips_tagged_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn strips_uppercase_tagged_fences() {
        assert_eq!(strip_code_fences("```JSON\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```Json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn uppercase_fence_parses_like_plain() {
        let plain = parse_analysis_response(&sample_json()).unwrap();
        let fenced =
            parse_analysis_response(&format!("```JSON\n{}\n```", sample_json())).unwrap();
        assert_eq!(plain.metrics, fenced.metrics);
        assert_eq!(plain.feedback, fenced.feedback);
    }

    #[test]
    fn strips_bare_fences() {
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```\n"), "{\"a\":1}");
    }

    #[test]
    fn unfenced_text_is_trimmed() {
        assert_eq!(strip_code_fences("  {\"a\":1}\n"), "{\"a\":1}");
    }

    #[test]
    fn parses_unfenced_response() {
        let result = parse_analysis_response(&sample_json()).unwrap();
        assert_eq!(result.meeting_type, "Sales");
        assert_eq!(result.duration, "45 minutes");
        assert_eq!(result.metrics.get(Metric::Rapport), 60);
        assert_eq!(result.overall_score(), 80);
        assert_eq!(result.feedback.len(), 2);
        assert_eq!(result.feedback[0].category, "Discovery");
        assert_eq!(result.feedback[1].severity, Severity::Critical);
    }

    #[test]
    fn fenced_and_unfenced_parse_identically() {
        let plain = parse_analysis_response(&sample_json()).unwrap();
        let fenced =
            parse_analysis_response(&format!("```json\n{}\n```", sample_json())).unwrap();
        assert_eq!(plain.metrics, fenced.metrics);
        assert_eq!(plain.feedback, fenced.feedback);
        assert_eq!(plain.overall_score(), fenced.overall_score());
    }

    #[test]
    fn empty_feedback_is_accepted() {
        let mut value: serde_json::Value = serde_json::from_str(&sample_json()).unwrap();
        value["feedback"] = serde_json::json!([]);
        let result = parse_analysis_response(&value.to_string()).unwrap();
        assert!(result.feedback.is_empty());
    }

    #[test]
    fn prose_is_malformed() {
        let err = parse_analysis_response("I'm sorry, I cannot analyse this.").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn empty_text_is_malformed() {
        let err = parse_analysis_response("```json\n```").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn missing_metric_is_malformed() {
        let json = sample_json().replace("\"Problem Solving\": 100", "\"Charisma\": 100");
        let err = parse_analysis_response(&json).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn extra_metric_is_malformed() {
        let json = sample_json().replace("\"Rapport\": 60,", "\"Rapport\": 60, \"Charisma\": 50,");
        let err = parse_analysis_response(&json).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(msg) if msg.contains("Charisma")));
    }

    #[test]
    fn out_of_range_score_is_malformed() {
        let json = sample_json().replace("\"Rapport\": 60", "\"Rapport\": 150");
        assert!(matches!(
            parse_analysis_response(&json),
            Err(AnalysisError::MalformedResponse(_))
        ));
        let json = sample_json().replace("\"Rapport\": 60", "\"Rapport\": -5");
        assert!(matches!(
            parse_analysis_response(&json),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn fractional_score_is_malformed() {
        let json = sample_json().replace("\"Rapport\": 60", "\"Rapport\": 60.5");
        assert!(matches!(
            parse_analysis_response(&json),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn integral_float_score_is_accepted() {
        let json = sample_json().replace("\"Rapport\": 60", "\"Rapport\": 60.0");
        let result = parse_analysis_response(&json).unwrap();
        assert_eq!(result.metrics.get(Metric::Rapport), 60);
    }

    #[test]
    fn string_score_is_malformed() {
        let json = sample_json().replace("\"Rapport\": 60", "\"Rapport\": \"60\"");
        assert!(matches!(
            parse_analysis_response(&json),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn unknown_severity_is_malformed() {
        let json = sample_json().replace("\"severity\": \"warning\"", "\"severity\": \"minor\"");
        assert!(matches!(
            parse_analysis_response(&json),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_feedback_field_is_malformed() {
        let json = sample_json().replace("\"timestamp\": \"00:05:10\",", "");
        assert!(matches!(
            parse_analysis_response(&json),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_top_level_key_is_malformed() {
        let json = sample_json().replace("\"duration\": \"45 minutes\",", "");
        assert!(matches!(
            parse_analysis_response(&json),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn remote_overall_score_is_ignored() {
        let json = sample_json().replace(
            "\"meetingType\": \"Sales\",",
            "\"meetingType\": \"Sales\", \"overallScore\": 3,",
        );
        let result = parse_analysis_response(&json).unwrap();
        assert_eq!(result.overall_score(), 80);
    }
}
