//! Drift intelligence: one probe per window, detailed checks against the
//! detail window, and the invalid-window rejection contract.

use serde_json::json;
use vigil_models::config::DriftSuiteConfig;
use vigil_models::rule::{Expectation, Predicate};
use vigil_models::{Check, ProbeRequest, TestCase};

const REJECTION_TIMEOUT_SECONDS: u64 = 10;

pub fn window_case_name(window: &str) -> String {
    format!("Drift Intelligence API ({window})")
}

pub fn cases(config: &DriftSuiteConfig, timeout_seconds: u64) -> Vec<TestCase> {
    let mut cases: Vec<TestCase> = config
        .windows
        .iter()
        .map(|window| {
            let name = window_case_name(window);
            let request = ProbeRequest::get(&config.path)
                .with_query("window", window.as_str())
                .with_timeout(timeout_seconds);
            TestCase::probe(&name, request)
                .check(Check::required(
                    format!("{name} Structure"),
                    &["ok", "meta", "comparisons", "matrix"],
                ))
                .check(Check::equals(format!("{name} OK"), "ok", json!(true)))
        })
        .collect();

    if config.windows.contains(&config.detail_window) {
        cases.push(detail_case(config));
    }

    let rejection = ProbeRequest::get(&config.path)
        .with_query("window", config.invalid_window.as_str())
        .with_timeout(REJECTION_TIMEOUT_SECONDS);
    cases.push(
        TestCase::probe("Invalid Window Rejection", rejection)
            .expect_status(&[400])
            .check(Check::equals("Invalid Window Not OK", "ok", json!(false)))
            .check(Check::contains(
                "Invalid Window Error Message",
                "error",
                config.invalid_window_error.as_str(),
            )),
    );

    cases
}

fn detail_case(config: &DriftSuiteConfig) -> TestCase {
    let window = &config.detail_window;
    let mut case = TestCase::reuse(format!("Drift Detail ({window})"), window_case_name(window))
        .check(Check::when(
            "CRITICAL Severity (LIVE=0)",
            "meta.liveSamples",
            json!(0),
            vec![Expectation::new(
                "meta.severity",
                Predicate::Equals(json!("CRITICAL")),
            )],
        ))
        .check(Check::covers_set(
            "Cohort Comparisons",
            "comparisons",
            "cohort",
            &config.expected_cohorts,
        ))
        .check(Check::keys_cover(
            "Delta Matrix Structure",
            "matrix",
            &config.expected_metrics,
        ));

    for metric in &config.expected_metrics {
        case = case.check(Check::non_empty(
            format!("Delta Matrix {metric} Data"),
            format!("matrix.{metric}"),
        ));
    }
    case
}
