use serde_json::Value;

const UNKNOWN_TRANSPORT_ERROR: &str = "transport failure";

/// Outcome of one HTTP call. Consumed by the assertion step and not retained
/// beyond the run.
///
/// Constructors keep two shapes apart:
/// - transport failure: no status, no body, a non-empty error
/// - received response: a status, plus either a parsed body or an error
///   describing why the body was not JSON
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    status: Option<u16>,
    body: Option<Value>,
    error: Option<String>,
    elapsed_ms: u64,
}

impl ProbeResult {
    pub fn transport_failure(error: impl Into<String>, elapsed_ms: u64) -> Self {
        let mut error = error.into();
        if error.trim().is_empty() {
            error = UNKNOWN_TRANSPORT_ERROR.to_string();
        }
        Self {
            status: None,
            body: None,
            error: Some(error),
            elapsed_ms,
        }
    }

    pub fn json(status: u16, body: Value, elapsed_ms: u64) -> Self {
        Self {
            status: Some(status),
            body: Some(body),
            error: None,
            elapsed_ms,
        }
    }

    pub fn non_json(status: u16, error: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            status: Some(status),
            body: None,
            error: Some(error.into()),
            elapsed_ms,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status.is_none()
    }
}
