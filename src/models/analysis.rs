use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Number of scored performance dimensions.
pub const METRIC_COUNT: usize = 5;

/// Upper bound of every metric score.
pub const MAX_SCORE: u8 = 100;

/// The five fixed performance dimensions, in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    TechnicalKnowledge,
    Rapport,
    MarketplaceStrategy,
    ClearCommunication,
    ProblemSolving,
}

impl Metric {
    pub const ALL: [Metric; METRIC_COUNT] = [
        Metric::TechnicalKnowledge,
        Metric::Rapport,
        Metric::MarketplaceStrategy,
        Metric::ClearCommunication,
        Metric::ProblemSolving,
    ];

    /// Name used both as the JSON key in generated output and as the chart label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TechnicalKnowledge => "Technical Knowledge",
            Self::Rapport => "Rapport",
            Self::MarketplaceStrategy => "Marketplace Strategy",
            Self::ClearCommunication => "Clear Communication",
            Self::ProblemSolving => "Problem Solving",
        }
    }

    /// Position in `ALL`.
    pub fn index(&self) -> usize {
        match self {
            Self::TechnicalKnowledge => 0,
            Self::Rapport => 1,
            Self::MarketplaceStrategy => 2,
            Self::ClearCommunication => 3,
            Self::ProblemSolving => 4,
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown metric '{s}'"))
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Score {value} for '{metric}' is outside 0-100")]
pub struct InvalidScore {
    pub metric: Metric,
    pub value: u8,
}

/// One score per metric, always complete and always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricScores {
    scores: [u8; METRIC_COUNT],
}

impl MetricScores {
    /// Build from scores given in canonical order.
    pub fn new(scores: [u8; METRIC_COUNT]) -> Result<Self, InvalidScore> {
        for metric in Metric::ALL {
            let value = scores[metric.index()];
            if value > MAX_SCORE {
                return Err(InvalidScore { metric, value });
            }
        }
        Ok(Self { scores })
    }

    pub fn get(&self, metric: Metric) -> u8 {
        self.scores[metric.index()]
    }

    /// `(metric, score)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, u8)> + '_ {
        Metric::ALL.into_iter().map(|m| (m, self.get(m)))
    }

    /// Rounded arithmetic mean of the five scores (halves round up).
    pub fn overall(&self) -> u8 {
        let sum: u32 = self.scores.iter().map(|&s| u32::from(s)).sum();
        let mean = f64::from(sum) / METRIC_COUNT as f64;
        // mean is within [0, 100] because every score is
        mean.round() as u8
    }
}

impl Serialize for MetricScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(METRIC_COUNT))?;
        for (metric, score) in self.iter() {
            map.serialize_entry(metric.as_str(), &score)?;
        }
        map.end()
    }
}

/// Severity of a feedback entry.
///
/// `Warning` is the moderate level; the wire value is `"warning"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// One identified improvement point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub category: String,
    pub issue: String,
    pub suggestion: String,
    /// Approximate position in the meeting, free-form (e.g. `00:15:30`).
    pub timestamp: String,
    pub severity: Severity,
}

/// Complete analysis of one meeting transcript.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub meeting_type: String,
    pub objective: String,
    pub duration: String,
    pub metrics: MetricScores,
    pub feedback: Vec<FeedbackEntry>,
    overall_score: u8,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Assemble a result; the overall score is derived from `metrics`.
    pub fn new(
        meeting_type: String,
        objective: String,
        duration: String,
        metrics: MetricScores,
        feedback: Vec<FeedbackEntry>,
    ) -> Self {
        Self {
            meeting_type,
            objective,
            duration,
            overall_score: metrics.overall(),
            metrics,
            feedback,
            analyzed_at: Utc::now(),
        }
    }

    pub fn overall_score(&self) -> u8 {
        self.overall_score
    }

    /// One-line summary shown above the chart.
    pub fn summary_line(&self) -> String {
        format!(
            "{} • {} • Score: {}/100",
            self.meeting_type, self.objective, self.overall_score
        )
    }
}
