use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::rule::Check;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// A single query parameter value. Rendered verbatim into the query string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum QueryValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Integer(v) => write!(f, "{v}"),
            QueryValue::Float(v) => write!(f, "{v}"),
            QueryValue::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Integer(i64::from(value))
    }
}

/// One HTTP GET against a server-relative route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeRequest {
    /// Server-relative route, e.g. `/api/fractal/v2.1/chart`.
    pub path: String,
    #[serde(default)]
    pub query: BTreeMap<String, QueryValue>,
    /// Unset means the run's configured default applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl ProbeRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: BTreeMap::new(),
            timeout_seconds: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Fill in the timeout only if none was pinned.
    pub fn or_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds.get_or_insert(seconds);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

/// Renders as `path?k1=v1&k2=v2` with keys in sorted order. Used as a stable
/// identity for logs and scripted probers.
impl fmt::Display for ProbeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

/// How two or more earlier probe bodies are compared against each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Every body must carry a different value at the path.
    Distinct,
    /// Every body must carry the same value at the path.
    Same,
}

/// Where a test case gets the JSON it asserts against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaseTarget {
    /// Issue a fresh HTTP probe.
    Probe {
        request: ProbeRequest,
        #[serde(default = "default_expect_status")]
        expect_status: Vec<u16>,
    },
    /// Re-check the body fetched by an earlier probe case.
    Reuse { case: String },
    /// Compare a field across the bodies of several earlier probe cases.
    Compare {
        cases: Vec<String>,
        path: String,
        comparison: Comparison,
    },
}

/// One named check in a run. Built once at startup; never mutated during a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub target: CaseTarget,
    #[serde(default)]
    pub checks: Vec<Check>,
    /// When set and the case fails, no further cases are executed.
    #[serde(default)]
    pub gate: bool,
}

impl TestCase {
    pub fn probe(name: impl Into<String>, request: ProbeRequest) -> Self {
        Self {
            name: name.into(),
            target: CaseTarget::Probe {
                request,
                expect_status: default_expect_status(),
            },
            checks: Vec::new(),
            gate: false,
        }
    }

    pub fn reuse(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: CaseTarget::Reuse {
                case: source.into(),
            },
            checks: Vec::new(),
            gate: false,
        }
    }

    pub fn compare(
        name: impl Into<String>,
        cases: Vec<String>,
        path: impl Into<String>,
        comparison: Comparison,
    ) -> Self {
        Self {
            name: name.into(),
            target: CaseTarget::Compare {
                cases,
                path: path.into(),
                comparison,
            },
            checks: Vec::new(),
            gate: false,
        }
    }

    /// Replace the accepted status codes. Has no effect on non-probe cases.
    pub fn expect_status(mut self, codes: &[u16]) -> Self {
        if let CaseTarget::Probe { expect_status, .. } = &mut self.target {
            *expect_status = codes.to_vec();
        }
        self
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn gate(mut self) -> Self {
        self.gate = true;
        self
    }

    /// Apply `seconds` to a probe request that does not pin its own timeout.
    pub fn with_default_timeout(mut self, seconds: u64) -> Self {
        if let CaseTarget::Probe { request, .. } = &mut self.target {
            request.timeout_seconds.get_or_insert(seconds);
        }
        self
    }

    /// Names of earlier cases this case reads from.
    pub fn dependencies(&self) -> Vec<&str> {
        match &self.target {
            CaseTarget::Probe { .. } => Vec::new(),
            CaseTarget::Reuse { case } => vec![case.as_str()],
            CaseTarget::Compare { cases, .. } => cases.iter().map(String::as_str).collect(),
        }
    }
}

fn default_expect_status() -> Vec<u16> {
    vec![200]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Check;

    #[test]
    fn request_display_sorts_query() {
        let request = ProbeRequest::get("/api/fractal/v2.1/chart")
            .with_query("symbol", "BTC")
            .with_query("limit", 365u32);
        assert_eq!(
            request.to_string(),
            "/api/fractal/v2.1/chart?limit=365&symbol=BTC"
        );
    }

    #[test]
    fn request_display_without_query() {
        assert_eq!(ProbeRequest::get("/").to_string(), "/");
    }

    #[test]
    fn probe_case_defaults_to_200() {
        let case = TestCase::probe("Chart API", ProbeRequest::get("/chart"));
        match case.target {
            CaseTarget::Probe { expect_status, .. } => assert_eq!(expect_status, vec![200]),
            other => panic!("unexpected target: {other:?}"),
        }
    }

    #[test]
    fn expect_status_ignored_for_reuse() {
        let case = TestCase::reuse("Detail", "Source").expect_status(&[400]);
        assert_eq!(
            case.target,
            CaseTarget::Reuse {
                case: "Source".to_string()
            }
        );
    }

    #[test]
    fn dependencies_follow_target() {
        let compare = TestCase::compare(
            "Horizons differ",
            vec!["a".to_string(), "b".to_string()],
            "meta.focus",
            Comparison::Distinct,
        );
        assert_eq!(compare.dependencies(), vec!["a", "b"]);
        assert!(TestCase::probe("p", ProbeRequest::get("/")).dependencies().is_empty());
    }

    #[test]
    fn case_from_toml() {
        let toml_str = r#"
name = "Invalid Window Validation"
gate = false

[target]
kind = "probe"
expect_status = [400]

[target.request]
path = "/api/spx/v2.1/admin/drift/intelligence"
timeout_seconds = 10
query = { window = "invalid_window" }

[[checks]]
name = "Rejects invalid window"
rule = { kind = "contains", path = "error", substring = "Invalid window" }
"#;
        let case: TestCase = toml::from_str(toml_str).unwrap();
        assert_eq!(case.name, "Invalid Window Validation");
        match &case.target {
            CaseTarget::Probe {
                request,
                expect_status,
            } => {
                assert_eq!(expect_status, &vec![400]);
                assert_eq!(request.timeout_seconds, Some(10));
                assert_eq!(
                    request.query.get("window"),
                    Some(&QueryValue::Text("invalid_window".to_string()))
                );
            }
            other => panic!("unexpected target: {other:?}"),
        }
        assert_eq!(
            case.checks,
            vec![Check::contains(
                "Rejects invalid window",
                "error",
                "Invalid window"
            )]
        );
    }

    #[test]
    fn integer_query_value_from_toml() {
        let toml_str = r#"
path = "/api/lifecycle/events"
query = { limit = 100 }
"#;
        let request: ProbeRequest = toml::from_str(toml_str).unwrap();
        assert_eq!(request.query.get("limit"), Some(&QueryValue::Integer(100)));
        assert_eq!(request.timeout_seconds, None);
        assert_eq!(request.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
    }

    #[test]
    fn pinned_timeout_survives_default() {
        let pinned = ProbeRequest::get("/").with_timeout(10).or_timeout(5);
        assert_eq!(pinned.timeout_seconds, Some(10));
        let unpinned = ProbeRequest::get("/").or_timeout(5);
        assert_eq!(unpinned.timeout(), Duration::from_secs(5));
    }
}
