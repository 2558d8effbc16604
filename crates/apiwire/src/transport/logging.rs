//! Request/response logging hook.
//!
//! The hook only observes exchanges. Everything is emitted under the
//! `apiwire::http` target so it can be filtered independently.

use std::time::Duration;

use reqwest::header::HeaderMap;
use tracing::debug;

use crate::config::HttpLogLevel;

/// Bodies longer than this are truncated in log output.
const MAX_LOGGED_BODY: usize = 4096;

/// Headers whose values never appear in logs.
const REDACTED_HEADERS: &[&str] = &["authorization", "proxy-authorization", "cookie", "set-cookie"];

#[derive(Clone, Copy, Debug)]
pub struct HttpLogger {
    level: HttpLogLevel,
}

impl HttpLogger {
    pub fn new(level: HttpLogLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> HttpLogLevel {
        self.level
    }

    pub fn log_request(&self, request: &reqwest::Request) {
        if self.level == HttpLogLevel::None {
            return;
        }
        debug!(target: "apiwire::http", method = %request.method(), url = %request.url(), "--> request");

        if self.level >= HttpLogLevel::Headers {
            debug!(target: "apiwire::http", headers = %format_headers(request.headers()), "--> headers");
        }

        if self.level >= HttpLogLevel::Body {
            match request.body().and_then(|b| b.as_bytes()) {
                Some(bytes) => {
                    debug!(target: "apiwire::http", body = %body_preview(bytes), "--> body")
                }
                None => debug!(target: "apiwire::http", "--> no buffered body"),
            }
        }
    }

    pub fn log_response(&self, response: &reqwest::Response, elapsed: Duration) {
        if self.level == HttpLogLevel::None {
            return;
        }
        debug!(
            target: "apiwire::http",
            status = response.status().as_u16(),
            url = %response.url(),
            elapsed_ms = elapsed.as_millis() as u64,
            "<-- response"
        );

        if self.level >= HttpLogLevel::Headers {
            debug!(target: "apiwire::http", headers = %format_headers(response.headers()), "<-- headers");
        }
    }

    /// Log a response body once the caller has buffered it.
    pub fn log_response_body(&self, body: &[u8]) {
        if self.level >= HttpLogLevel::Body {
            debug!(target: "apiwire::http", body = %body_preview(body), "<-- body");
        }
    }

    pub fn log_failure(&self, error: &reqwest::Error, elapsed: Duration) {
        if self.level == HttpLogLevel::None {
            return;
        }
        debug!(
            target: "apiwire::http",
            error = %error,
            elapsed_ms = elapsed.as_millis() as u64,
            "<-- failed"
        );
    }
}

/// Render headers as `name: value` pairs with credentials redacted.
pub(crate) fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if REDACTED_HEADERS.contains(&name.as_str()) {
                "██"
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            format!("{}: {}", name, value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn body_preview(body: &[u8]) -> String {
    if body.len() <= MAX_LOGGED_BODY {
        String::from_utf8_lossy(body).into_owned()
    } else {
        format!(
            "{}... ({} bytes)",
            String::from_utf8_lossy(&body[..MAX_LOGGED_BODY]),
            body.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, HeaderValue};

    #[test]
    fn credentials_are_redacted() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        headers.insert(COOKIE, HeaderValue::from_static("session=abc"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let rendered = format_headers(&headers);
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("session=abc"));
        assert!(rendered.contains("content-type: application/json"));
    }

    #[test]
    fn short_body_is_logged_whole() {
        assert_eq!(body_preview(br#"{"ok":true}"#), r#"{"ok":true}"#);
    }

    #[test]
    fn long_body_is_truncated() {
        let body = vec![b'a'; MAX_LOGGED_BODY + 10];
        let preview = body_preview(&body);
        assert!(preview.ends_with(&format!("... ({} bytes)", MAX_LOGGED_BODY + 10)));
    }
}
