//! Built-in declarative suites for the Fractal analytics API.
//!
//! Each suite is a plain table of [`TestCase`] values; the runner and the
//! assertion engine interpret them.

pub mod chart;
pub mod connectivity;
pub mod drift;
pub mod lifecycle;
pub mod terminal;

use vigil_models::config::{HarnessConfig, SuiteKind};
use vigil_models::TestCase;

/// Cases for the requested suites in canonical order, each suite at most once.
pub fn builtin_cases(config: &HarnessConfig, kinds: &[SuiteKind]) -> Vec<TestCase> {
    let mut kinds = kinds.to_vec();
    kinds.sort();
    kinds.dedup();

    let timeout = config.target.default_timeout_seconds;
    kinds
        .into_iter()
        .flat_map(|kind| match kind {
            SuiteKind::Connectivity => connectivity::cases(),
            SuiteKind::Chart => chart::cases(&config.chart, timeout),
            SuiteKind::Drift => drift::cases(&config.drift, timeout),
            SuiteKind::Terminal => terminal::cases(&config.terminal, timeout),
            SuiteKind::Lifecycle => lifecycle::cases(&config.lifecycle, timeout),
        })
        .collect()
}
