use std::time::Duration;

use reqwest::{Client, Url};
use tracing::debug;
use vigil_models::ProbeRequest;

use crate::error::ProbeError;

/// Build a client shared by every probe in a run. Per-request timeouts are
/// applied in [`send_get`]; only the connect timeout lives on the client.
pub fn build_client(connect_timeout: Duration) -> Result<Client, ProbeError> {
    let client = Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Join a base URL and a server-relative route, then append the query.
///
/// The base URL's own path is kept, so `https://host/prefix` + `/api/x`
/// becomes `https://host/prefix/api/x`.
pub fn build_url(base_url: &str, request: &ProbeRequest) -> Result<Url, ProbeError> {
    let base = base_url.trim().trim_end_matches('/');
    let path = request.path.trim();
    let joined = if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    };

    let mut url = Url::parse(&joined).map_err(|e| ProbeError::InvalidUrl(format!("{joined}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ProbeError::InvalidUrl(format!(
            "{joined}: unsupported scheme `{}`",
            url.scheme()
        )));
    }

    if !request.query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &request.query {
            pairs.append_pair(key, &value.to_string());
        }
    }

    Ok(url)
}

/// Issue one GET. A single attempt, bounded by `timeout` from connect to the
/// last body byte. Any HTTP status counts as a received response.
pub async fn send_get(
    client: &Client,
    url: Url,
    timeout: Duration,
) -> Result<(u16, Vec<u8>), ProbeError> {
    if timeout.is_zero() {
        return Err(ProbeError::InvalidTimeout(timeout.as_secs()));
    }

    debug!(url = %url, timeout_s = timeout.as_secs(), "Sending GET");

    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify(e, timeout))?;

    let status = response.status().as_u16();
    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            ProbeError::Timeout(timeout.as_secs())
        } else {
            ProbeError::Body(e.to_string())
        }
    })?;

    Ok((status, bytes.to_vec()))
}

fn classify(error: reqwest::Error, timeout: Duration) -> ProbeError {
    if error.is_timeout() {
        ProbeError::Timeout(timeout.as_secs())
    } else if error.is_connect() {
        ProbeError::Connect(error_chain(&error))
    } else {
        ProbeError::Request(error_chain(&error))
    }
}

/// reqwest's top-level message is terse ("error sending request"); the cause
/// chain carries the DNS or socket detail.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path() {
        let request = ProbeRequest::get("/api/fractal/v2.1/chart")
            .with_query("symbol", "BTC")
            .with_query("limit", 365u32);
        let url = build_url("https://fractal.example.com/", &request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://fractal.example.com/api/fractal/v2.1/chart?limit=365&symbol=BTC"
        );
    }

    #[test]
    fn keeps_base_prefix() {
        let request = ProbeRequest::get("api/lifecycle/state");
        let url = build_url("http://localhost:8001/backend", &request).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/backend/api/lifecycle/state");
    }

    #[test]
    fn root_path() {
        let url = build_url("http://localhost:8001", &ProbeRequest::get("/")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/");
    }

    #[test]
    fn encodes_query_values() {
        let request = ProbeRequest::get("/search").with_query("q", "a b&c");
        let url = build_url("http://localhost", &request).unwrap();
        assert_eq!(url.query(), Some("q=a+b%26c"));
    }

    #[test]
    fn rejects_garbage_base() {
        let result = build_url("not a url", &ProbeRequest::get("/"));
        assert!(matches!(result, Err(ProbeError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn zero_timeout_is_rejected_before_sending() {
        let client = build_client(Duration::from_secs(1)).unwrap();
        let url = build_url("http://127.0.0.1:9", &ProbeRequest::get("/")).unwrap();
        let result = send_get(&client, url, Duration::ZERO).await;
        assert!(matches!(result, Err(ProbeError::InvalidTimeout(0))));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let result = build_url("ftp://files.example.com", &ProbeRequest::get("/"));
        assert!(matches!(result, Err(ProbeError::InvalidUrl(_))));
    }
}
