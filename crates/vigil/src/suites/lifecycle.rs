use serde_json::json;
use vigil_models::config::LifecycleSuiteConfig;
use vigil_models::{Check, ProbeRequest, TestCase};

pub fn cases(config: &LifecycleSuiteConfig, timeout_seconds: u64) -> Vec<TestCase> {
    let state = ProbeRequest::get(&config.state_path).with_timeout(timeout_seconds);
    let events = ProbeRequest::get(&config.events_path)
        .with_query("limit", config.events_limit)
        .with_timeout(timeout_seconds);

    vec![
        TestCase::probe("Lifecycle State", state)
            .check(Check::equals("Lifecycle State OK", "ok", json!(true)))
            .check(Check::required(
                "Lifecycle State Structure",
                &["data.states", "data.combined"],
            )),
        TestCase::probe("Lifecycle Events", events)
            .check(Check::equals("Lifecycle Events OK", "ok", json!(true))),
    ]
}
