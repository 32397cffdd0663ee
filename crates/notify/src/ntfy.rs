//! ntfy publishing client.
//!
//! ntfy delivers a POST body as a push message to every subscriber of the
//! topic named in the URL path (`{server}/{topic}`). The body is the raw
//! UTF-8 message text; no JSON envelope is involved. Delivery is strictly
//! best-effort: a single attempt with a bounded timeout, no retry.

use std::time::Duration;

use leakwatch_core::{EffectError, Messenger};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for ntfy delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum NtfyError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The ntfy server returned a non-2xx status code.
    #[error("ntfy returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// NtfyNotifier
// ---------------------------------------------------------------------------

/// Publishes monitor notifications to an ntfy topic.
pub struct NtfyNotifier {
    client: reqwest::Client,
    server: String,
    default_topic: String,
}

impl NtfyNotifier {
    /// Create a notifier with a pre-configured HTTP client.
    ///
    /// * `server`        - base URL of the ntfy server, e.g. `https://ntfy.sh`.
    /// * `default_topic` - topic used when a send does not name one.
    pub fn new(server: String, default_topic: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            server,
            default_topic,
        }
    }

    /// Publish `message` to `topic` (or the default topic) in one attempt.
    pub async fn publish(&self, message: &str, topic: Option<&str>) -> Result<(), NtfyError> {
        let url = topic_url(&self.server, topic, &self.default_topic);
        let response = self
            .client
            .post(&url)
            .body(message.to_string())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(NtfyError::HttpStatus(response.status().as_u16()));
        }
        tracing::debug!(url = %url, "Notification published");
        Ok(())
    }
}

impl Messenger for NtfyNotifier {
    async fn send(&self, message: &str, topic: Option<&str>) -> Result<(), EffectError> {
        self.publish(message, topic)
            .await
            .map_err(|e| EffectError::Delivery(e.to_string()))
    }
}

/// Build the publish URL, falling back to `default` when no topic is named
/// and tolerating a trailing slash on the configured server base.
fn topic_url(server: &str, topic: Option<&str>, default: &str) -> String {
    format!(
        "{}/{}",
        server.trim_end_matches('/'),
        topic.unwrap_or(default)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_panic() {
        let _notifier = NtfyNotifier::new("https://ntfy.sh".to_string(), "home_alerts".to_string());
    }

    #[test]
    fn topic_url_uses_default_when_no_topic_given() {
        assert_eq!(
            topic_url("https://ntfy.sh", None, "home_alerts"),
            "https://ntfy.sh/home_alerts"
        );
    }

    #[test]
    fn topic_url_prefers_explicit_topic() {
        assert_eq!(
            topic_url("https://ntfy.sh", Some("basement"), "home_alerts"),
            "https://ntfy.sh/basement"
        );
    }

    #[test]
    fn topic_url_strips_trailing_slash() {
        assert_eq!(
            topic_url("https://ntfy.example.com/", None, "leaks"),
            "https://ntfy.example.com/leaks"
        );
    }

    #[test]
    fn error_display_http_status() {
        let err = NtfyError::HttpStatus(502);
        assert_eq!(err.to_string(), "ntfy returned HTTP 502");
    }

    #[test]
    fn error_display_request() {
        // Build a reqwest error from an invalid URL.
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = NtfyError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }
}
