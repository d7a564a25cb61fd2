//! MCP host channel: JSON-RPC 2.0 wire types and the stdio server.
//!
//! Tool results map onto MCP content blocks. Binary summaries travel as
//! text blocks holding their JSON description, since the bytes themselves
//! are never inlined.

pub mod server;

pub use server::{McpServer, ServerError};

use crate::types::{ContentBlock, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol revision announced when the host does not request one.
pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "hcdp-mcp";

/// An MCP tool invocation request (`tools/call` params).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolInvocation {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// An MCP tool invocation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpToolResult {
    pub content: Vec<McpContent>,
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

/// MCP content block within a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl McpContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: text.into(),
        }
    }
}

impl From<ContentBlock> for McpContent {
    fn from(block: ContentBlock) -> Self {
        match block {
            ContentBlock::Text { text } => McpContent::text(text),
            summary @ ContentBlock::BinarySummary { .. } => {
                let text = serde_json::to_string_pretty(&summary)
                    .unwrap_or_else(|e| format!("binary payload (summary unavailable: {})", e));
                McpContent::text(text)
            }
        }
    }
}

impl From<ToolResult> for McpToolResult {
    fn from(result: ToolResult) -> Self {
        Self {
            content: result.content.into_iter().map(McpContent::from).collect(),
            is_error: result.is_error,
        }
    }
}

/// Incoming JSON-RPC message. Notifications carry no `id`.
#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl Response {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.unwrap_or(Value::Null),
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, error: ServerError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.unwrap_or(Value::Null),
            result: None,
            error: Some(ResponseError::from(error)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ResponseError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<ServerError> for ResponseError {
    fn from(err: ServerError) -> Self {
        let code = match &err {
            ServerError::Parse(_) => -32700,
            ServerError::InvalidRequest(_) => -32600,
            ServerError::InvalidMethod(_) => -32601,
            ServerError::InvalidParams(_) => -32602,
            ServerError::Io(_) | ServerError::Serialization(_) => -32603,
        };
        Self {
            code,
            message: err.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_result_to_mcp() {
        let result = ToolResult::success(vec![
            ContentBlock::text("hello"),
            ContentBlock::BinarySummary {
                byte_size: 3,
                media_type: "image/tiff".into(),
                sha256: "00".repeat(32),
                path: None,
            },
        ]);
        let mcp = McpToolResult::from(result);
        assert!(!mcp.is_error);
        assert_eq!(mcp.content[0], McpContent::text("hello"));
        let summary: Value = serde_json::from_str(&mcp.content[1].text).unwrap();
        assert_eq!(summary["byte_size"], 3);
        assert_eq!(mcp.content[1].content_type, "text");
    }

    #[test]
    fn test_is_error_wire_name() {
        let v = serde_json::to_value(McpToolResult::from(ToolResult::error("x"))).unwrap();
        assert_eq!(v["isError"], true);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ResponseError::from(ServerError::InvalidMethod("x".into())).code, -32601);
        assert_eq!(ResponseError::from(ServerError::InvalidParams("x".into())).code, -32602);
        let parse = serde_json::from_str::<Value>("{").unwrap_err();
        assert_eq!(ResponseError::from(ServerError::Parse(parse)).code, -32700);
    }

    #[test]
    fn test_response_shapes() {
        let ok = serde_json::to_value(Response::success(Some(json!(1)), json!({}))).unwrap();
        assert_eq!(ok, json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
        let err = serde_json::to_value(Response::error(None, ServerError::InvalidMethod("nope".into()))).unwrap();
        assert_eq!(err["id"], Value::Null);
        assert_eq!(err["error"]["code"], -32601);
    }
}
