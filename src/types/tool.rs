//! Uniform tool-result envelope.

use serde::{Deserialize, Serialize};

/// Text shown when a successful response carries nothing.
pub const NO_DATA_TEXT: &str = "No data for the given parameters.";

/// One piece of tool output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    /// Summary of a binary payload (raster, zip); the bytes themselves are
    /// never inlined.
    BinarySummary {
        byte_size: usize,
        media_type: String,
        sha256: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::BinarySummary { .. } => None,
        }
    }
}

/// Result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub is_error: bool,
    pub content: Vec<ContentBlock>,
}

impl ToolResult {
    pub fn success(content: Vec<ContentBlock>) -> Self {
        Self {
            is_error: false,
            content,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::success(vec![ContentBlock::text(text)])
    }

    pub fn no_data() -> Self {
        Self::text(NO_DATA_TEXT)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// First text block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(ContentBlock::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_binary_summary_serialization() {
        let block = ContentBlock::BinarySummary {
            byte_size: 42,
            media_type: "image/tiff".into(),
            sha256: "ab".repeat(32),
            path: None,
        };
        let v = serde_json::to_value(&block).unwrap();
        assert_eq!(v["type"], "binary_summary");
        assert_eq!(v["byte_size"], 42);
        assert!(v.get("path").is_none());
    }

    #[test]
    fn test_constructors() {
        assert!(!ToolResult::no_data().is_error);
        assert_eq!(ToolResult::no_data().first_text(), Some(NO_DATA_TEXT));
        let err = ToolResult::error("boom");
        assert!(err.is_error);
        assert_eq!(serde_json::to_value(&err).unwrap()["content"][0], json!({"type": "text", "text": "boom"}));
    }
}
