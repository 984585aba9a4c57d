//! Error taxonomy for chat requests.
//!
//! Request-level failures propagate to the caller as [`ChatError`]. Problems
//! with a single stream frame are reported as [`FrameError`], which the
//! decoder logs and skips instead of failing the exchange.

use std::error::Error as StdError;
use std::fmt;

/// A connection setting that must be present before a request is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSetting {
    Endpoint,
    ApiKey,
    Model,
}

impl MissingSetting {
    pub fn hint(self) -> &'static str {
        match self {
            MissingSetting::Endpoint => "Set one with 'reasonstream set endpoint <url>'.",
            MissingSetting::ApiKey => {
                "Set one with 'reasonstream set api-key <key>' or export OPENAI_API_KEY."
            }
            MissingSetting::Model => {
                "Run 'reasonstream models' and pick one with 'reasonstream set model <id>'."
            }
        }
    }
}

impl fmt::Display for MissingSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingSetting::Endpoint => write!(f, "No API endpoint configured"),
            MissingSetting::ApiKey => write!(f, "No API key configured"),
            MissingSetting::Model => write!(f, "No model selected"),
        }
    }
}

/// Errors surfaced to the user for a chat or model-listing request.
#[derive(Debug)]
pub enum ChatError {
    /// Connection settings are incomplete; no request was sent.
    Configuration(MissingSetting),
    /// The request failed on the network or the server answered with a
    /// non-success status.
    Transport {
        status: Option<u16>,
        message: String,
    },
    /// The server answered successfully but the payload had the wrong shape.
    Format(String),
}

impl ChatError {
    pub fn http_status(status: u16, body: &str) -> Self {
        ChatError::Transport {
            status: Some(status),
            message: format_api_error(body),
        }
    }

    pub fn network(err: impl fmt::Display) -> Self {
        ChatError::Transport {
            status: None,
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Configuration(missing) => write!(f, "{missing}. {}", missing.hint()),
            ChatError::Transport {
                status: Some(status),
                message,
            } => write!(f, "HTTP {status}: {message}"),
            ChatError::Transport {
                status: None,
                message,
            } => write!(f, "Request failed: {message}"),
            ChatError::Format(detail) => write!(f, "Invalid response format: {detail}"),
        }
    }
}

impl StdError for ChatError {}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Transport {
            status: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}

/// A single stream frame that could not be decoded.
#[derive(Debug)]
pub enum FrameError {
    Utf8(std::str::Utf8Error),
    Json(serde_json::Error),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Utf8(err) => write!(f, "invalid UTF-8 in stream frame: {err}"),
            FrameError::Json(err) => write!(f, "invalid JSON in stream frame: {err}"),
        }
    }
}

impl StdError for FrameError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            FrameError::Utf8(err) => Some(err),
            FrameError::Json(err) => Some(err),
        }
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Condense an error body for display. JSON bodies are reduced to their
/// `error.message` when one exists; anything else is trimmed and kept as is.
pub fn format_api_error(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&json_value) {
            if !summary.is_empty() {
                return summary;
            }
        }
        if let Ok(compact) = serde_json::to_string(&json_value) {
            return compact;
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_api_error_prefers_json_summary() {
        let raw = r#"{"error":{"message":"model   overloaded","type":"invalid_request_error"}}"#;
        assert_eq!(format_api_error(raw), "model overloaded");
    }

    #[test]
    fn format_api_error_handles_json_without_summary() {
        assert_eq!(
            format_api_error("{ \"status\": \"failed\" }"),
            r#"{"status":"failed"}"#
        );
    }

    #[test]
    fn format_api_error_handles_plaintext_and_empty() {
        assert_eq!(format_api_error("  bad gateway \n"), "bad gateway");
        assert_eq!(format_api_error(""), "<empty body>");
    }

    #[test]
    fn http_status_errors_keep_status() {
        let err = ChatError::http_status(401, r#"{"error":{"message":"Invalid key"}}"#);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "HTTP 401: Invalid key");
    }

    #[test]
    fn configuration_errors_carry_a_hint() {
        let err = ChatError::Configuration(MissingSetting::Model);
        assert!(err.to_string().starts_with("No model selected."));
        assert_eq!(err.status(), None);
    }
}
