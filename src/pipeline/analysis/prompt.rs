use crate::models::Metric;

/// Build the analysis prompt for one transcript.
///
/// Only playbook names are sent; their content never leaves the process.
pub fn build_analysis_prompt(transcript: &str, playbook_names: &[String]) -> String {
    let playbooks = playbook_names.join(", ");
    let metrics = Metric::ALL
        .iter()
        .map(|m| format!("    \"{}\": <integer 0-100>", m.as_str()))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"You are an expert in analysing sales and consulting meetings. Analyse the following meeting transcript against sales best practices and the available playbooks.

AVAILABLE PLAYBOOKS: {playbooks}

MEETING TRANSCRIPT:
{transcript}

Provide a structured analysis as JSON with EXACTLY this structure:

{{
  "meetingType": "type of meeting (e.g. Sales, Consulting, Support, Onboarding)",
  "objective": "main objective of the meeting in one sentence",
  "duration": "estimated duration",
  "metrics": {{
{metrics}
  }},
  "feedback": [
    {{
      "category": "category name",
      "issue": "description of the identified problem",
      "suggestion": "specific improvement suggestion referencing a playbook",
      "timestamp": "approximate moment (e.g. 00:15:30)",
      "severity": "warning or critical"
    }}
  ]
}}

IMPORTANT:
- Score each metric from 0 to 100 based on the observed performance
- Identify 3-5 specific improvement points
- Give an actionable suggestion for each point
- Name the playbook relevant to each suggestion
- Use "warning" for moderate problems and "critical" for serious ones
- Return ONLY the JSON, with no text before or after it"#
    )
}
