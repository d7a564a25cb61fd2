//! Error translation: upstream failures and local errors to [`ToolError`].

use crate::error_code::ToolErrorKind;
use crate::transport::TransportError;
use crate::types::ToolResult;
use crate::Error;
use serde::Serialize;
use serde_json::{json, Value};

/// Tool-facing error: a kind from the small taxonomy, the message to show,
/// and machine-readable details (status, raw body).
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{} ({}): {message}", .kind.name(), .kind.code())]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Value::Null,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Render as an error result. The text block carries the JSON error so
    /// hosts can read kind and code programmatically.
    pub fn into_tool_result(self) -> ToolResult {
        let body = json!({
            "error": self.kind.name(),
            "code": self.kind.code(),
            "message": &self.message,
            "details": &self.details,
        });
        let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| self.message.clone());
        ToolResult::error(text)
    }
}

/// Translate a non-2xx response.
pub fn translate(status: u16, body: &[u8]) -> ToolError {
    let raw = String::from_utf8_lossy(body);
    let raw = raw.trim();
    let message = upstream_message(raw)
        .or_else(|| (!raw.is_empty()).then(|| raw.to_string()))
        .unwrap_or_else(|| reason_phrase(status).to_string());
    ToolError::new(ToolErrorKind::from_http_status(status), message)
        .with_details(json!({"status": status, "body": raw}))
}

/// The upstream's own message: `message`, `error`, `detail`, or `error.message`.
fn upstream_message(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let obj = value.as_object()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| {
            obj.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
}

fn reason_phrase(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown status")
}

impl From<&TransportError> for ToolError {
    fn from(err: &TransportError) -> Self {
        match err {
            TransportError::Timeout(after) => ToolError::new(
                ToolErrorKind::TimeoutError,
                format!("HCDP API did not respond within {}s", after.as_secs()),
            ),
            TransportError::Connection(msg) => ToolError::new(
                ToolErrorKind::UpstreamError,
                format!("could not reach the HCDP API: {}", msg),
            ),
            TransportError::UnexpectedStatus(status) => ToolError::new(
                ToolErrorKind::UpstreamError,
                format!("unexpected HTTP status {}", status),
            )
            .with_details(json!({"status": status})),
        }
    }
}

impl From<Error> for ToolError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(v) => ToolError::new(ToolErrorKind::ValidationError, v.to_string())
                .with_details(json!({
                    "field": v.field,
                    "reason": v.reason.as_str(),
                    "message": v.message,
                })),
            Error::Configuration { message, context } => {
                let mut details = serde_json::Map::new();
                if let Some(field) = context.field_path {
                    details.insert("field".into(), json!(field));
                }
                if let Some(hint) = context.details {
                    details.insert("hint".into(), json!(hint));
                }
                ToolError::new(ToolErrorKind::ConfigurationError, message)
                    .with_details(if details.is_empty() { Value::Null } else { Value::Object(details) })
            }
            Error::Transport(t) => ToolError::from(&t),
            Error::Io(e) => ToolError::new(ToolErrorKind::UpstreamError, e.to_string()),
            Error::Serialization(e) => ToolError::new(ToolErrorKind::UpstreamError, e.to_string()),
        }
    }
}

impl From<crate::protocol::ValidationError> for ToolError {
    fn from(err: crate::protocol::ValidationError) -> Self {
        Error::Validation(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_401_preserves_upstream_message() {
        let err = translate(401, br#"{"message": "Token expired at 2024-01-01"}"#);
        assert_eq!(err.kind, ToolErrorKind::AuthenticationError);
        assert_eq!(err.message, "Token expired at 2024-01-01");
        assert_eq!(err.details["status"], 401);
    }

    #[test]
    fn test_message_keys() {
        assert_eq!(translate(400, br#"{"error": "bad extent"}"#).message, "bad extent");
        assert_eq!(translate(400, br#"{"detail": "nope"}"#).message, "nope");
        assert_eq!(translate(400, br#"{"error": {"message": "nested"}}"#).message, "nested");
    }

    #[test]
    fn test_raw_body_and_reason_phrase_fallbacks() {
        let err = translate(502, b"  upstream proxy failure \n");
        assert_eq!(err.kind, ToolErrorKind::UpstreamError);
        assert_eq!(err.message, "upstream proxy failure");
        assert_eq!(translate(404, b"").message, "Not Found");
        assert_eq!(translate(404, b"").kind, ToolErrorKind::NotFound);
    }

    #[test]
    fn test_transport_errors() {
        let t = ToolError::from(&TransportError::Timeout(Duration::from_secs(30)));
        assert_eq!(t.kind, ToolErrorKind::TimeoutError);
        let c = ToolError::from(&TransportError::Connection("refused".into()));
        assert_eq!(c.kind, ToolErrorKind::UpstreamError);
    }

    #[test]
    fn test_into_tool_result_is_error() {
        let result = translate(403, br#"{"message":"forbidden"}"#).into_tool_result();
        assert!(result.is_error);
        let body: Value = serde_json::from_str(result.first_text().unwrap()).unwrap();
        assert_eq!(body["error"], "AuthenticationError");
        assert_eq!(body["code"], "E1002");
        assert_eq!(body["message"], "forbidden");
    }
}
