use vigil_models::ProbeResult;

const PREVIEW_CHARS: usize = 80;

/// Turn a received response into a [`ProbeResult`].
///
/// The body is parsed as JSON whatever the declared content type. An empty or
/// unparsable body keeps the status and records why there is no body.
pub fn decode_body(status: u16, bytes: &[u8], elapsed_ms: u64) -> ProbeResult {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return ProbeResult::non_json(
            status,
            format!("Empty response body (status {status})"),
            elapsed_ms,
        );
    }

    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(body) => ProbeResult::json(status, body, elapsed_ms),
        Err(e) => ProbeResult::non_json(
            status,
            format!(
                "Non-JSON response body (status {status}, {} bytes): {e}; starts with {:?}",
                bytes.len(),
                preview(bytes)
            ),
            elapsed_ms,
        ),
    }
}

/// First few characters of a body, for error messages.
fn preview(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim_start();
    let mut out: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    if trimmed.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_json_object() {
        let result = decode_body(200, br#"{"ok": true, "candles": []}"#, 15);
        assert_eq!(result.status(), Some(200));
        assert_eq!(result.body(), Some(&json!({"ok": true, "candles": []})));
        assert!(result.error().is_none());
        assert_eq!(result.elapsed_ms(), 15);
    }

    #[test]
    fn decodes_error_payload_on_400() {
        let result = decode_body(400, br#"{"ok": false, "error": "Invalid window"}"#, 3);
        assert_eq!(result.status(), Some(400));
        assert_eq!(result.body().unwrap()["error"], "Invalid window");
    }

    #[test]
    fn html_is_not_json() {
        let result = decode_body(404, b"<!DOCTYPE html><html><body>Not Found</body></html>", 2);
        assert_eq!(result.status(), Some(404));
        assert!(result.body().is_none());
        let error = result.error().unwrap();
        assert!(error.contains("Non-JSON"));
        assert!(error.contains("<!DOCTYPE html>"));
    }

    #[test]
    fn empty_body() {
        let result = decode_body(204, b"  \n", 1);
        assert!(result.body().is_none());
        assert_eq!(result.error(), Some("Empty response body (status 204)"));
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let long = "x".repeat(200);
        let shown = preview(long.as_bytes());
        assert_eq!(shown.len(), PREVIEW_CHARS + 3);
        assert!(shown.ends_with("..."));
    }
}
