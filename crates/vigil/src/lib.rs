//! Vigil - contract smoke tests for the Fractal analytics HTTP API
//!
//! Declarative test cases are probed one at a time against a base URL,
//! their JSON bodies checked by the assertion engine, and every outcome
//! folded into a persisted run summary.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use vigil::models::{TestCase, ProbeRequest, Check};
//! use vigil::probe::{HttpProber, Prober};
//! use vigil::runner::Runner;
//! use vigil::suite::Suite;
//! ```

pub use vigil_assert as engine;
pub use vigil_models as models;
pub use vigil_probe as probe;

pub mod config;
pub mod error;
pub mod reporter;
pub mod runner;
pub mod suite;
pub mod suites;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use vigil_models::config::{HarnessConfig, SuiteKind};
use vigil_models::TestCase;
use vigil_probe::{HttpProber, Prober};

use crate::runner::Runner;
use crate::suite::Suite;

/// Build the HTTP prober for a resolved base URL.
pub fn build_prober(config: &HarnessConfig, base_url: &str) -> anyhow::Result<Arc<dyn Prober>> {
    let connect_timeout = Duration::from_secs(config.target.connect_timeout_seconds);
    let prober = HttpProber::new(base_url, connect_timeout)
        .with_context(|| format!("Failed to build prober for {base_url}"))?;
    Ok(Arc::new(prober))
}

/// Built-in cases for `kinds`, followed by any extra declared cases. Extra
/// probe cases without a pinned timeout use `[target].default_timeout_seconds`.
pub fn build_suite(
    config: &HarnessConfig,
    kinds: &[SuiteKind],
    extra: Vec<TestCase>,
) -> anyhow::Result<Suite> {
    let mut cases = suites::builtin_cases(config, kinds);
    let timeout = config.target.default_timeout_seconds;
    cases.extend(extra.into_iter().map(|case| case.with_default_timeout(timeout)));
    Suite::new(cases).context("Invalid test suite")
}

/// Build a runner that probes `base_url`, labelled from the report config.
pub fn build_runner(config: &HarnessConfig, base_url: &str) -> anyhow::Result<Runner> {
    let prober = build_prober(config, base_url)?;
    Ok(Runner::new(prober).with_label(config.report.label.clone()))
}
