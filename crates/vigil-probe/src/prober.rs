use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};
use vigil_models::{ProbeRequest, ProbeResult};

use crate::body::decode_body;
use crate::error::ProbeError;
use crate::http::{build_client, build_url, send_get};

/// Issues one request and reports what came back. Mockable for testing.
///
/// Implementations never fail: transport problems are folded into the
/// returned [`ProbeResult`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, request: &ProbeRequest) -> ProbeResult;
}

/// A prober that sends real HTTP GETs to a base URL.
pub struct HttpProber {
    client: Client,
    base_url: String,
}

impl HttpProber {
    /// Validates `base_url` up front so a bad value aborts before any case runs.
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self, ProbeError> {
        let base_url = base_url.into();
        build_url(&base_url, &ProbeRequest::get("/"))?;
        Ok(Self {
            client: build_client(connect_timeout)?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: &ProbeRequest, started: Instant) -> Result<ProbeResult, ProbeError> {
        let url = build_url(&self.base_url, request)?;
        let (status, bytes) = send_get(&self.client, url, request.timeout()).await?;
        Ok(decode_body(status, &bytes, elapsed_ms(started)))
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, request: &ProbeRequest) -> ProbeResult {
        let started = Instant::now();
        match self.send(request, started).await {
            Ok(result) => {
                info!(
                    request = %request,
                    status = result.status(),
                    json = result.body().is_some(),
                    elapsed_ms = result.elapsed_ms(),
                    "Probe complete"
                );
                result
            }
            Err(e) => {
                let elapsed = elapsed_ms(started);
                warn!(request = %request, error = %e, elapsed_ms = elapsed, "Probe failed");
                ProbeResult::transport_failure(e.to_string(), elapsed)
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_base_url() {
        let result = HttpProber::new("fractal.example.com", Duration::from_secs(1));
        assert!(matches!(result, Err(ProbeError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn zero_timeout_is_a_failed_probe() {
        let prober = HttpProber::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let result = prober.probe(&ProbeRequest::get("/").with_timeout(0)).await;
        assert!(result.is_transport_failure());
        assert!(result.error().unwrap().contains("Invalid timeout"));
    }
}
