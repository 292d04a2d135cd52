//! Scripted prober for exercising runners without a network.
//!
//! Responses are keyed by the request's display form (`path?k=v&...`, keys
//! sorted). An unscripted request behaves like a refused connection.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use vigil_models::{ProbeRequest, ProbeResult};

use crate::prober::Prober;

#[derive(Default)]
pub struct ScriptedProber {
    responses: HashMap<String, ProbeResult>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `key` with a JSON body.
    pub fn json(mut self, key: &str, status: u16, body: Value) -> Self {
        self.responses
            .insert(key.to_string(), ProbeResult::json(status, body, 5));
        self
    }

    /// Respond to `key` with a body that is not JSON.
    pub fn text(mut self, key: &str, status: u16) -> Self {
        self.responses.insert(
            key.to_string(),
            ProbeResult::non_json(status, format!("Non-JSON response body (status {status})"), 5),
        );
        self
    }

    /// Fail `key` at the transport level.
    pub fn unreachable(mut self, key: &str, error: &str) -> Self {
        self.responses
            .insert(key.to_string(), ProbeResult::transport_failure(error, 5));
        self
    }

    /// Requests seen so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, request: &ProbeRequest) -> ProbeResult {
        let key = request.to_string();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.clone());
        }
        self.responses.get(&key).cloned().unwrap_or_else(|| {
            ProbeResult::transport_failure(format!("Connection refused (unscripted request {key})"), 0)
        })
    }
}
