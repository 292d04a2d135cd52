use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Top-level configuration for a harness run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HarnessConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub suites: SuitesConfig,
    #[serde(default)]
    pub chart: ChartSuiteConfig,
    #[serde(default)]
    pub drift: DriftSuiteConfig,
    #[serde(default)]
    pub terminal: TerminalSuiteConfig,
    #[serde(default)]
    pub lifecycle: LifecycleSuiteConfig,
}

/// The service under test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    /// Base URL of the service. May instead come from `VIGIL_BASE_URL` or `--base-url`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout used by cases that do not pin their own.
    #[serde(default = "default_request_timeout")]
    pub default_timeout_seconds: u64,
    /// Timeout for establishing the TCP/TLS connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            default_timeout_seconds: default_request_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// Where the JSON run summary is written.
    #[serde(default = "default_report_path")]
    pub path: String,
    /// Label stored in the summary document.
    #[serde(default = "default_report_label")]
    pub label: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: default_report_path(),
            label: default_report_label(),
        }
    }
}

/// Built-in suites, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SuiteKind {
    Connectivity,
    Chart,
    Drift,
    Terminal,
    Lifecycle,
}

impl SuiteKind {
    pub const ALL: [SuiteKind; 5] = [
        SuiteKind::Connectivity,
        SuiteKind::Chart,
        SuiteKind::Drift,
        SuiteKind::Terminal,
        SuiteKind::Lifecycle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SuiteKind::Connectivity => "connectivity",
            SuiteKind::Chart => "chart",
            SuiteKind::Drift => "drift",
            SuiteKind::Terminal => "terminal",
            SuiteKind::Lifecycle => "lifecycle",
        }
    }
}

impl fmt::Display for SuiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuiteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SuiteKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = SuiteKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown suite `{s}` (expected one of: {})", names.join(", "))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuitesConfig {
    #[serde(default = "default_enabled_suites")]
    pub enabled: Vec<SuiteKind>,
}

impl Default for SuitesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_suites(),
        }
    }
}

/// Chart endpoint parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSuiteConfig {
    #[serde(default = "default_chart_path")]
    pub path: String,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of candles requested.
    #[serde(default = "default_chart_limit")]
    pub limit: u32,
    #[serde(default = "default_chart_fields")]
    pub required_fields: Vec<String>,
}

impl Default for ChartSuiteConfig {
    fn default() -> Self {
        Self {
            path: default_chart_path(),
            symbol: default_symbol(),
            limit: default_chart_limit(),
            required_fields: default_chart_fields(),
        }
    }
}

/// Drift-intelligence endpoint parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriftSuiteConfig {
    #[serde(default = "default_drift_path")]
    pub path: String,
    /// Window tokens probed one after another.
    #[serde(default = "default_drift_windows")]
    pub windows: Vec<String>,
    /// Window whose body is inspected by the detailed checks.
    #[serde(default = "default_detail_window")]
    pub detail_window: String,
    #[serde(default = "default_expected_cohorts")]
    pub expected_cohorts: Vec<String>,
    #[serde(default = "default_expected_metrics")]
    pub expected_metrics: Vec<String>,
    /// Token the service must reject with a 400.
    #[serde(default = "default_invalid_window")]
    pub invalid_window: String,
    /// Substring expected in the rejection's `error` field.
    #[serde(default = "default_invalid_window_error")]
    pub invalid_window_error: String,
}

impl Default for DriftSuiteConfig {
    fn default() -> Self {
        Self {
            path: default_drift_path(),
            windows: default_drift_windows(),
            detail_window: default_detail_window(),
            expected_cohorts: default_expected_cohorts(),
            expected_metrics: default_expected_metrics(),
            invalid_window: default_invalid_window(),
            invalid_window_error: default_invalid_window_error(),
        }
    }
}

/// Terminal (decision) and focus-pack endpoint parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerminalSuiteConfig {
    #[serde(default = "default_terminal_path")]
    pub decision_path: String,
    #[serde(default = "default_focus_pack_path")]
    pub focus_pack_path: String,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_horizons")]
    pub horizons: Vec<String>,
    /// Field compared across horizon bodies.
    #[serde(default = "default_horizon_field")]
    pub horizon_field: String,
    #[serde(default = "default_regimes")]
    pub regimes: Vec<String>,
}

impl Default for TerminalSuiteConfig {
    fn default() -> Self {
        Self {
            decision_path: default_terminal_path(),
            focus_pack_path: default_focus_pack_path(),
            symbol: default_symbol(),
            horizons: default_horizons(),
            horizon_field: default_horizon_field(),
            regimes: default_regimes(),
        }
    }
}

/// Lifecycle endpoint parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LifecycleSuiteConfig {
    #[serde(default = "default_lifecycle_state_path")]
    pub state_path: String,
    #[serde(default = "default_lifecycle_events_path")]
    pub events_path: String,
    #[serde(default = "default_events_limit")]
    pub events_limit: u32,
}

impl Default for LifecycleSuiteConfig {
    fn default() -> Self {
        Self {
            state_path: default_lifecycle_state_path(),
            events_path: default_lifecycle_events_path(),
            events_limit: default_events_limit(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_report_path() -> String {
    "test_reports/vigil_results.json".to_string()
}
fn default_report_label() -> String {
    "Fractal API Contract Smoke Test".to_string()
}
fn default_enabled_suites() -> Vec<SuiteKind> {
    SuiteKind::ALL.to_vec()
}
fn default_symbol() -> String {
    "BTC".to_string()
}
fn default_chart_path() -> String {
    "/api/fractal/v2.1/chart".to_string()
}
fn default_chart_limit() -> u32 {
    365
}
fn default_chart_fields() -> Vec<String> {
    vec!["candles".to_string(), "sma200".to_string()]
}
fn default_drift_path() -> String {
    "/api/spx/v2.1/admin/drift/intelligence".to_string()
}
fn default_drift_windows() -> Vec<String> {
    ["30d", "60d", "90d", "180d", "365d", "all"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}
fn default_detail_window() -> String {
    "90d".to_string()
}
fn default_expected_cohorts() -> Vec<String> {
    vec![
        "V1950".to_string(),
        "V2020".to_string(),
        "ALL_VINTAGE".to_string(),
    ]
}
fn default_expected_metrics() -> Vec<String> {
    vec![
        "hitRate".to_string(),
        "expectancy".to_string(),
        "sharpe".to_string(),
        "maxDD".to_string(),
    ]
}
fn default_invalid_window() -> String {
    "invalid_window".to_string()
}
fn default_invalid_window_error() -> String {
    "Invalid window".to_string()
}
fn default_terminal_path() -> String {
    "/api/fractal/v2.1/terminal".to_string()
}
fn default_focus_pack_path() -> String {
    "/api/fractal/v2.1/focus-pack".to_string()
}
fn default_horizons() -> Vec<String> {
    ["7d", "14d", "30d", "90d", "180d", "365d"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}
fn default_horizon_field() -> String {
    "meta.focus".to_string()
}
fn default_regimes() -> Vec<String> {
    ["LOW", "NORMAL", "ELEVATED", "HIGH", "CRISIS"]
        .iter()
        .map(|r| r.to_string())
        .collect()
}
fn default_lifecycle_state_path() -> String {
    "/api/lifecycle/state".to_string()
}
fn default_lifecycle_events_path() -> String {
    "/api/lifecycle/events".to_string()
}
fn default_events_limit() -> u32 {
    100
}
