use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;
use vigil_assert::{assert_shape, compare_across};
use vigil_models::{AssertionOutcome, CaseTarget, Comparison, ProbeResult, RunSummary, TestCase};
use vigil_probe::Prober;

use crate::reporter::Reporter;
use crate::suite::Suite;

pub const DEFAULT_LABEL: &str = "Fractal API Contract Smoke Test";

/// What an earlier probe case left behind for dependent cases.
struct CaseRecord {
    result: ProbeResult,
    /// Body present and every outcome of the case passed.
    usable: bool,
}

/// Executes a suite case by case, in declared order, one request at a time.
pub struct Runner {
    prober: Arc<dyn Prober>,
    label: String,
    console: bool,
}

impl Runner {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            prober,
            label: DEFAULT_LABEL.to_string(),
            console: true,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Toggle the PASS/FAIL lines on stdout.
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub async fn run(&self, suite: &Suite) -> RunSummary {
        let run_id = Uuid::new_v4();
        let start = Instant::now();
        info!(%run_id, cases = suite.len(), label = %self.label, "Starting run");

        let mut reporter = Reporter::new(self.console);
        let mut records: HashMap<String, CaseRecord> = HashMap::new();

        for case in suite.cases() {
            let first = reporter.outcomes().len();

            match &case.target {
                CaseTarget::Probe {
                    request,
                    expect_status,
                } => {
                    let result = self.prober.probe(request).await;
                    reporter.record_all(probe_outcomes(case, &result, expect_status));
                    let usable = result.body().is_some() && reporter.all_passed_since(first);
                    records.insert(case.name.clone(), CaseRecord { result, usable });
                }
                CaseTarget::Reuse { case: source } => {
                    reporter.record_all(reuse_outcomes(case, source, &records));
                }
                CaseTarget::Compare {
                    cases,
                    path,
                    comparison,
                } => {
                    reporter.record(compare_outcome(case, cases, path, *comparison, &records));
                }
            }

            if case.gate && !reporter.all_passed_since(first) {
                warn!(case = %case.name, "Gate case failed, stopping run");
                break;
            }
        }

        let summary = reporter.finish(run_id, &self.label);
        info!(
            %run_id,
            passed = summary.tests_passed(),
            total = summary.tests_total(),
            elapsed_ms = start.elapsed().as_millis(),
            "Run complete"
        );
        summary
    }
}

/// Outcomes for a freshly probed case. A transport failure or an unexpected
/// status yields exactly one failed outcome and skips the checks.
fn probe_outcomes(case: &TestCase, result: &ProbeResult, expect_status: &[u16]) -> Vec<AssertionOutcome> {
    let Some(status) = result.status() else {
        let error = result.error().unwrap_or("transport failure");
        warn!(case = %case.name, error, "Request failed");
        return vec![AssertionOutcome::fail(&case.name, format!("Request failed: {error}"))];
    };

    if !expect_status.contains(&status) {
        let details = match result.body().and_then(|b| b.get("error")).and_then(Value::as_str) {
            Some(message) => format!("Status code {status}, expected {expect_status:?}: {message}"),
            None => format!("Status code {status}, expected {expect_status:?}"),
        };
        return vec![AssertionOutcome::fail(&case.name, details)];
    }

    let Some(body) = result.body() else {
        let error = result.error().unwrap_or("response body is not JSON");
        return if case.checks.is_empty() {
            vec![AssertionOutcome::pass(
                &case.name,
                format!("HTTP {status} in {} ms", result.elapsed_ms()),
            )]
        } else {
            vec![AssertionOutcome::fail(&case.name, error)]
        };
    };

    let mut outcomes = vec![AssertionOutcome::pass(
        &case.name,
        format!("HTTP {status} in {} ms", result.elapsed_ms()),
    )];
    outcomes.extend(assert_shape(body, &case.checks));
    outcomes
}

fn reuse_outcomes(
    case: &TestCase,
    source: &str,
    records: &HashMap<String, CaseRecord>,
) -> Vec<AssertionOutcome> {
    match usable_body(source, records) {
        Some(body) => assert_shape(body, &case.checks),
        None => vec![not_applicable(case, &[source])],
    }
}

fn compare_outcome(
    case: &TestCase,
    sources: &[String],
    path: &str,
    comparison: Comparison,
    records: &HashMap<String, CaseRecord>,
) -> AssertionOutcome {
    let mut bodies: Vec<(&str, &Value)> = Vec::with_capacity(sources.len());
    let mut unusable: Vec<&str> = Vec::new();
    for source in sources {
        match usable_body(source, records) {
            Some(body) => bodies.push((source.as_str(), body)),
            None => unusable.push(source.as_str()),
        }
    }

    if !unusable.is_empty() {
        return not_applicable(case, &unusable);
    }
    compare_across(&case.name, &bodies, path, comparison)
}

fn usable_body<'a>(source: &str, records: &'a HashMap<String, CaseRecord>) -> Option<&'a Value> {
    records
        .get(source)
        .filter(|record| record.usable)
        .and_then(|record| record.result.body())
}

fn not_applicable(case: &TestCase, failed: &[&str]) -> AssertionOutcome {
    info!(case = %case.name, prerequisites = ?failed, "Skipping dependent case");
    AssertionOutcome::not_applicable(
        &case.name,
        format!("prerequisite failed ({})", failed.join(", ")),
    )
}
