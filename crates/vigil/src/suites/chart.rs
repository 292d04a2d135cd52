use vigil_models::config::ChartSuiteConfig;
use vigil_models::{Check, ProbeRequest, TestCase};

pub fn cases(config: &ChartSuiteConfig, timeout_seconds: u64) -> Vec<TestCase> {
    let fields: Vec<&str> = config.required_fields.iter().map(String::as_str).collect();
    let request = ProbeRequest::get(&config.path)
        .with_query("symbol", config.symbol.as_str())
        .with_query("limit", config.limit)
        .with_timeout(timeout_seconds);

    vec![TestCase::probe("Chart API", request)
        .check(Check::required("Chart API Structure", &fields))
        .check(Check::non_empty("Chart API Data", "candles"))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_assert::assert_shape;
    use serde_json::json;

    #[test]
    fn chart_checks_against_sample_body() {
        let case = &cases(&ChartSuiteConfig::default(), 30)[0];
        let body = json!({
            "candles": [{"t": 1, "o": 1.0, "h": 2.0, "l": 0.5, "c": 1.5}],
            "sma200": [1.2]
        });
        let outcomes = assert_shape(&body, &case.checks);
        assert!(outcomes.iter().all(|o| o.passed), "{outcomes:?}");

        let empty = json!({"candles": [], "sma200": []});
        let outcomes = assert_shape(&empty, &case.checks);
        assert!(outcomes[0].passed);
        assert!(!outcomes[1].passed);
    }
}
