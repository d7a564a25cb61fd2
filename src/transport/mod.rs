//! Transport seam: sends an [`EndpointRequest`] and returns the raw response.

pub mod http;

pub use http::HttpTransport;

use crate::protocol::EndpointRequest;
use async_trait::async_trait;
use bytes::Bytes;

/// How the payload should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Binary,
    Json,
    Text,
}

impl ContentKind {
    /// Classify by `Content-Type`; without one, sniff for UTF-8.
    pub fn detect(media_type: Option<&str>, payload: &[u8]) -> Self {
        let Some(media_type) = media_type else {
            return if std::str::from_utf8(payload).is_ok() {
                Self::Text
            } else {
                Self::Binary
            };
        };
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if essence == "application/json" || essence.ends_with("+json") {
            Self::Json
        } else if essence.starts_with("text/") {
            Self::Text
        } else {
            Self::Binary
        }
    }
}

/// Raw upstream response. 2xx, 4xx and 5xx all arrive here with body intact.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointResponse {
    pub status: u16,
    pub content_kind: ContentKind,
    pub media_type: Option<String>,
    pub payload: Bytes,
}

impl EndpointResponse {
    pub fn new(status: u16, media_type: Option<String>, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        Self {
            status,
            content_kind: ContentKind::detect(media_type.as_deref(), &payload),
            media_type,
            payload,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),
}

/// Sends endpoint requests. Implementations must be shareable across tasks.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &EndpointRequest) -> Result<EndpointResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_content_kind() {
        assert_eq!(ContentKind::detect(Some("application/json; charset=utf-8"), b"{}"), ContentKind::Json);
        assert_eq!(ContentKind::detect(Some("application/geo+json"), b"{}"), ContentKind::Json);
        assert_eq!(ContentKind::detect(Some("text/csv"), b"a,b"), ContentKind::Text);
        assert_eq!(ContentKind::detect(Some("image/tiff"), b"II*\0"), ContentKind::Binary);
        assert_eq!(ContentKind::detect(None, b"plain words"), ContentKind::Text);
        assert_eq!(ContentKind::detect(None, &[0xff, 0xfe, 0x00]), ContentKind::Binary);
    }

    #[test]
    fn test_response_success_range() {
        assert!(EndpointResponse::new(204, None, Vec::new()).is_success());
        assert!(!EndpointResponse::new(404, None, "missing").is_success());
    }
}
