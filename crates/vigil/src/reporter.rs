use std::path::Path;

use tracing::info;
use uuid::Uuid;
use vigil_models::{AssertionOutcome, RunSummary};

use crate::error::ReportError;

/// Accumulates outcomes in execution order and echoes each one to stdout.
#[derive(Debug, Default)]
pub struct Reporter {
    console: bool,
    outcomes: Vec<AssertionOutcome>,
}

impl Reporter {
    pub fn new(console: bool) -> Self {
        Self {
            console,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: AssertionOutcome) {
        if self.console {
            println!("{}", format_outcome(&outcome));
        }
        self.outcomes.push(outcome);
    }

    pub fn record_all(&mut self, outcomes: impl IntoIterator<Item = AssertionOutcome>) {
        for outcome in outcomes {
            self.record(outcome);
        }
    }

    pub fn outcomes(&self) -> &[AssertionOutcome] {
        &self.outcomes
    }

    /// Whether every outcome recorded since `from` passed.
    pub fn all_passed_since(&self, from: usize) -> bool {
        self.outcomes.iter().skip(from).all(|o| o.passed)
    }

    pub fn finish(self, run_id: Uuid, label: &str) -> RunSummary {
        let summary = report(run_id, label, self.outcomes);
        if self.console {
            println!("{}", format_totals(&summary));
        }
        summary
    }
}

/// Fold an ordered outcome list into the run summary.
pub fn report(run_id: Uuid, label: &str, outcomes: Vec<AssertionOutcome>) -> RunSummary {
    RunSummary::new(run_id, label, outcomes)
}

pub fn format_outcome(outcome: &AssertionOutcome) -> String {
    let marker = if outcome.passed { "PASS" } else { "FAIL" };
    if outcome.details.is_empty() {
        format!("[{marker}] {}", outcome.test_name)
    } else {
        format!("[{marker}] {}\n    {}", outcome.test_name, outcome.details)
    }
}

pub fn format_banner(label: &str, base_url: &str) -> String {
    let rule = "=".repeat(60);
    format!("{rule}\n{label}\nTarget: {base_url}\n{rule}")
}

pub fn format_totals(summary: &RunSummary) -> String {
    let rule = "=".repeat(60);
    format!(
        "{rule}\nTests passed: {}/{} ({})\n{rule}",
        summary.tests_passed(),
        summary.tests_total(),
        summary.success_rate_label()
    )
}

/// Write the summary document as pretty JSON, creating parent directories.
pub fn persist(summary: &RunSummary, path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), tests = summary.tests_total(), "Summary written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_pass_and_fail_lines() {
        let pass = AssertionOutcome::pass("Chart API", "HTTP 200 in 12 ms");
        assert_eq!(format_outcome(&pass), "[PASS] Chart API\n    HTTP 200 in 12 ms");

        let fail = AssertionOutcome::fail("Chart API", "");
        assert_eq!(format_outcome(&fail), "[FAIL] Chart API");
    }

    #[test]
    fn finish_keeps_execution_order() {
        let mut reporter = Reporter::new(false);
        reporter.record(AssertionOutcome::pass("a", ""));
        reporter.record_all(vec![
            AssertionOutcome::fail("b", "bad"),
            AssertionOutcome::pass("c", ""),
        ]);
        assert!(!reporter.all_passed_since(0));
        assert!(reporter.all_passed_since(2));

        let summary = reporter.finish(Uuid::new_v4(), "label");
        let names: Vec<&str> = summary.outcomes().iter().map(|o| o.test_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(summary.tests_passed(), 2);
        assert_eq!(summary.tests_total(), 3);
    }

    #[test]
    fn totals_line() {
        let summary = report(
            Uuid::new_v4(),
            "label",
            vec![
                AssertionOutcome::pass("a", ""),
                AssertionOutcome::fail("b", ""),
                AssertionOutcome::pass("c", ""),
            ],
        );
        assert!(format_totals(&summary).contains("Tests passed: 2/3 (66.7%)"));
    }

    #[test]
    fn empty_run_reports_zero_percent() {
        let summary = report(Uuid::new_v4(), "label", Vec::new());
        assert!(format_totals(&summary).contains("0/0 (0%)"));
    }

    #[test]
    fn persist_creates_parents_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/reports/results.json");
        let summary = report(
            Uuid::new_v4(),
            "Fractal API Contract Smoke Test",
            vec![AssertionOutcome::pass("a", "ok")],
        );
        persist(&summary, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["summary"], "Fractal API Contract Smoke Test");
        assert_eq!(doc["tests_passed"], 1);
        assert_eq!(doc["tests_total"], 1);
        assert_eq!(doc["success_rate"], "100.0%");
        assert_eq!(doc["test_details"][0]["test_name"], "a");

        let back: RunSummary = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn persist_into_a_file_path_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().join("results.json");
        let summary = report(Uuid::new_v4(), "label", Vec::new());
        assert!(persist(&summary, &path).is_err());
    }
}
