//! Integration tests for `HttpProber` against a local socket.
//!
//! Each test binds a `TcpListener` on 127.0.0.1 and serves one canned
//! HTTP/1.1 response, so no external service is needed.
//!
//! Run with:
//! ```bash
//! cargo test -p vigil-probe --test http_probe
//! ```

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use vigil_models::ProbeRequest;
use vigil_probe::{HttpProber, Prober};

/// Serve a single response and hand back the request line that was received.
async fn serve_once(status_line: &str, content_type: &str, body: &str) -> (SocketAddr, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let text = String::from_utf8_lossy(&buf).to_string();
        let request_line = text.lines().next().unwrap_or_default().to_string();
        let _ = tx.send(request_line);
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    (addr, rx)
}

fn prober_for(addr: SocketAddr) -> HttpProber {
    HttpProber::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn json_response_is_parsed() {
    let (addr, request_line) = serve_once(
        "200 OK",
        "application/json",
        r#"{"candles": [{"c": 1.0}], "sma200": 42.5}"#,
    )
    .await;
    let prober = prober_for(addr);

    let request = ProbeRequest::get("/api/fractal/v2.1/chart")
        .with_query("symbol", "BTC")
        .with_query("limit", 365u32)
        .with_timeout(5);
    let result = prober.probe(&request).await;

    assert_eq!(result.status(), Some(200));
    assert_eq!(
        result.body(),
        Some(&json!({"candles": [{"c": 1.0}], "sma200": 42.5}))
    );
    assert!(result.error().is_none());
    assert_eq!(
        request_line.await.unwrap(),
        "GET /api/fractal/v2.1/chart?limit=365&symbol=BTC HTTP/1.1"
    );
}

#[tokio::test]
async fn error_status_keeps_json_body() {
    let (addr, _) = serve_once(
        "400 Bad Request",
        "application/json",
        r#"{"ok": false, "error": "Invalid window: invalid_window"}"#,
    )
    .await;
    let prober = prober_for(addr);

    let request = ProbeRequest::get("/api/spx/v2.1/admin/drift/intelligence")
        .with_query("window", "invalid_window")
        .with_timeout(5);
    let result = prober.probe(&request).await;

    assert_eq!(result.status(), Some(400));
    assert_eq!(result.body().unwrap()["ok"], false);
}

#[tokio::test]
async fn html_response_has_status_but_no_body() {
    let (addr, _) = serve_once("404 Not Found", "text/html", "<html>Not Found</html>").await;
    let prober = prober_for(addr);

    let result = prober.probe(&ProbeRequest::get("/").with_timeout(5)).await;

    assert_eq!(result.status(), Some(404));
    assert!(result.body().is_none());
    assert!(result.error().unwrap().contains("Non-JSON"));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_failure() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let prober = prober_for(addr);

    let started = Instant::now();
    let result = prober.probe(&ProbeRequest::get("/").with_timeout(3)).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(result.is_transport_failure());
    assert!(result.body().is_none());
    assert!(!result.error().unwrap().is_empty());
}

#[tokio::test]
async fn silent_server_times_out_within_bound() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });
    let prober = prober_for(addr);

    let started = Instant::now();
    let result = prober.probe(&ProbeRequest::get("/slow").with_timeout(1)).await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(900), "returned too early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "timeout not enforced: {elapsed:?}");
    assert!(result.is_transport_failure());
    assert!(result.error().unwrap().contains("timed out"));
}
