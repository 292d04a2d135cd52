use vigil_models::{ProbeRequest, TestCase};

pub const CONNECTIVITY_CASE: &str = "API Connectivity";
const CONNECTIVITY_TIMEOUT_SECONDS: u64 = 10;

/// Probe the service root. Any 200 or 404 means the server is answering;
/// anything else stops the run.
pub fn cases() -> Vec<TestCase> {
    vec![TestCase::probe(
        CONNECTIVITY_CASE,
        ProbeRequest::get("/").with_timeout(CONNECTIVITY_TIMEOUT_SECONDS),
    )
    .expect_status(&[200, 404])
    .gate()]
}
