//! Terminal decision and focus-pack horizons.

use rust_decimal::Decimal;
use serde_json::{json, Value};
use vigil_models::config::TerminalSuiteConfig;
use vigil_models::rule::{Expectation, Predicate};
use vigil_models::{Check, Comparison, ProbeRequest, TestCase};

pub const DECISION_CASE: &str = "Terminal Decision";

pub fn horizon_case_name(horizon: &str) -> String {
    format!("Focus Pack ({horizon})")
}

/// When the volatility regime is CRISIS the sizing kernel must refuse to trade.
pub fn crisis_sizing_rule() -> Check {
    Check::when(
        "Crisis Mode Blocks Trading",
        "volatility.regime",
        json!("CRISIS"),
        vec![
            Expectation::new("decisionKernel.sizing.mode", Predicate::Equals(json!("NO_TRADE"))),
            Expectation::new(
                "decisionKernel.sizing.finalSize",
                Predicate::NumberEquals(Decimal::ZERO),
            ),
            Expectation::new("decisionKernel.sizing.blockers", Predicate::NonEmpty),
        ],
    )
}

pub fn cases(config: &TerminalSuiteConfig, timeout_seconds: u64) -> Vec<TestCase> {
    let regimes: Vec<Value> = config.regimes.iter().map(|r| json!(r)).collect();
    let decision = ProbeRequest::get(&config.decision_path)
        .with_query("symbol", config.symbol.as_str())
        .with_timeout(timeout_seconds);

    let mut cases = vec![TestCase::probe(DECISION_CASE, decision)
        .check(Check::required(
            "Decision Sizing Breakdown",
            &[
                "volatility.regime",
                "decisionKernel.sizing.mode",
                "decisionKernel.sizing.finalSize",
                "decisionKernel.sizing.blockers",
            ],
        ))
        .check(Check::one_of("Volatility Regime Known", "volatility.regime", regimes))
        .check(Check::numeric(
            "Final Size Numeric",
            "decisionKernel.sizing.finalSize",
        ))
        .check(crisis_sizing_rule())];

    let mut horizon_cases = Vec::with_capacity(config.horizons.len());
    for horizon in &config.horizons {
        let name = horizon_case_name(horizon);
        let request = ProbeRequest::get(&config.focus_pack_path)
            .with_query("symbol", config.symbol.as_str())
            .with_query("focus", horizon.as_str())
            .with_timeout(timeout_seconds);
        cases.push(
            TestCase::probe(&name, request).check(Check::required(
                format!("{name} Structure"),
                &[config.horizon_field.as_str()],
            )),
        );
        horizon_cases.push(name);
    }

    if horizon_cases.len() >= 2 {
        cases.push(TestCase::compare(
            "Horizon Comparison",
            horizon_cases,
            &config.horizon_field,
            Comparison::Distinct,
        ));
    }

    cases
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_assert::{assert_shape, evaluate};

    #[test]
    fn decision_then_horizons_then_comparison() {
        let config = TerminalSuiteConfig::default();
        let cases = cases(&config, 30);
        assert_eq!(cases.len(), 1 + config.horizons.len() + 1);
        assert_eq!(cases[0].name, DECISION_CASE);
        assert_eq!(cases[1].name, "Focus Pack (7d)");
        assert_eq!(cases.last().unwrap().name, "Horizon Comparison");
        assert_eq!(cases.last().unwrap().dependencies().len(), config.horizons.len());
    }

    #[test]
    fn single_horizon_has_no_comparison() {
        let config = TerminalSuiteConfig {
            horizons: vec!["30d".to_string()],
            ..TerminalSuiteConfig::default()
        };
        let cases = cases(&config, 30);
        assert!(cases.iter().all(|c| c.name != "Horizon Comparison"));
    }

    #[test]
    fn crisis_no_trade_decision_passes_every_check() {
        let body = json!({
            "volatility": {"regime": "CRISIS"},
            "decisionKernel": {"sizing": {"mode": "NO_TRADE", "finalSize": 0, "blockers": ["VOL_CRISIS"]}}
        });
        let decision = &cases(&TerminalSuiteConfig::default(), 30)[0];
        let outcomes = assert_shape(&body, &decision.checks);
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.iter().all(|o| o.passed), "{outcomes:?}");
    }

    #[test]
    fn crisis_standard_sizing_fails() {
        let body = json!({
            "volatility": {"regime": "CRISIS"},
            "decisionKernel": {"sizing": {"mode": "STANDARD", "finalSize": 1.0, "blockers": []}}
        });
        let outcome = evaluate(&body, &crisis_sizing_rule());
        assert!(!outcome.passed);
        assert!(outcome.details.contains("NO_TRADE"));
    }

    #[test]
    fn unknown_regime_fails() {
        let body = json!({
            "volatility": {"regime": "EXTREME"},
            "decisionKernel": {"sizing": {"mode": "STANDARD", "finalSize": 0.5, "blockers": []}}
        });
        let decision = &cases(&TerminalSuiteConfig::default(), 30)[0];
        let outcomes = assert_shape(&body, &decision.checks);
        assert!(!outcomes[1].passed);
        assert!(outcomes[3].passed);
    }
}
