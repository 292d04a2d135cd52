pub mod case;
pub mod config;
pub mod outcome;
pub mod probe_result;
pub mod rule;

pub use case::{CaseTarget, Comparison, ProbeRequest, QueryValue, TestCase};
pub use config::{HarnessConfig, SuiteKind};
pub use outcome::{AssertionOutcome, RunSummary, SummaryDocument};
pub use probe_result::ProbeResult;
pub use rule::{Check, Expectation, Predicate, Rule};
