use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of one named check. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionOutcome {
    pub test_name: String,
    pub passed: bool,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl AssertionOutcome {
    pub fn new(test_name: impl Into<String>, passed: bool, details: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            passed,
            details: details.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn pass(test_name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(test_name, true, details)
    }

    pub fn fail(test_name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(test_name, false, details)
    }

    /// A skipped check counts as passed so an upstream failure is reported once.
    pub fn not_applicable(test_name: impl Into<String>, reason: impl AsRef<str>) -> Self {
        Self::new(
            test_name,
            true,
            format!("Not applicable: {}", reason.as_ref()),
        )
    }
}

/// Aggregate of one run. Counts and success rate are always derived from
/// the outcome list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SummaryDocument", try_from = "SummaryDocument")]
pub struct RunSummary {
    run_id: Uuid,
    label: String,
    timestamp: DateTime<Utc>,
    outcomes: Vec<AssertionOutcome>,
}

impl RunSummary {
    pub fn new(run_id: Uuid, label: impl Into<String>, outcomes: Vec<AssertionOutcome>) -> Self {
        Self {
            run_id,
            label: label.into(),
            timestamp: Utc::now(),
            outcomes,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn outcomes(&self) -> &[AssertionOutcome] {
        &self.outcomes
    }

    pub fn tests_total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn tests_passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn tests_failed(&self) -> usize {
        self.tests_total() - self.tests_passed()
    }

    /// Percentage in `0.0..=100.0`, or `None` for an empty run.
    pub fn success_rate(&self) -> Option<f64> {
        let total = self.tests_total();
        if total == 0 {
            return None;
        }
        Some(self.tests_passed() as f64 / total as f64 * 100.0)
    }

    /// `"87.5%"`, or `"0%"` for an empty run.
    pub fn success_rate_label(&self) -> String {
        match self.success_rate() {
            Some(rate) => format!("{rate:.1}%"),
            None => "0%".to_string(),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.tests_passed() == self.tests_total()
    }
}

/// On-disk form of a [`RunSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDocument {
    pub run_id: Uuid,
    pub summary: String,
    pub tests_passed: usize,
    pub tests_total: usize,
    pub success_rate: String,
    pub timestamp: DateTime<Utc>,
    pub test_details: Vec<AssertionOutcome>,
}

impl From<RunSummary> for SummaryDocument {
    fn from(summary: RunSummary) -> Self {
        Self {
            run_id: summary.run_id,
            tests_passed: summary.tests_passed(),
            tests_total: summary.tests_total(),
            success_rate: summary.success_rate_label(),
            summary: summary.label,
            timestamp: summary.timestamp,
            test_details: summary.outcomes,
        }
    }
}

impl TryFrom<SummaryDocument> for RunSummary {
    type Error = String;

    fn try_from(doc: SummaryDocument) -> Result<Self, Self::Error> {
        let summary = RunSummary {
            run_id: doc.run_id,
            label: doc.summary,
            timestamp: doc.timestamp,
            outcomes: doc.test_details,
        };
        if summary.tests_total() != doc.tests_total || summary.tests_passed() != doc.tests_passed
        {
            return Err(format!(
                "summary counts {}/{} disagree with {} recorded outcomes ({} passed)",
                doc.tests_passed,
                doc.tests_total,
                summary.tests_total(),
                summary.tests_passed()
            ));
        }
        Ok(summary)
    }
}
