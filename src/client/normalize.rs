//! Response normalization: any [`EndpointResponse`] becomes a [`ToolResult`].

use super::error_translation::translate;
use crate::transport::{ContentKind, EndpointResponse};
use crate::types::{ContentBlock, ToolResult};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::Path;

const DIGEST_PREFIX_LEN: usize = 12;

/// Normalize a response. Never fails: upstream errors become error results,
/// undecodable JSON degrades to text, and output-directory write failures
/// only drop the path from the summary.
pub async fn normalize(tool: &str, response: EndpointResponse, output_dir: Option<&Path>) -> ToolResult {
    if !response.is_success() {
        let err = translate(response.status, &response.payload);
        tracing::warn!(tool, status = response.status, kind = err.kind.name(), "HCDP request failed");
        return err.into_tool_result();
    }

    match response.content_kind {
        ContentKind::Binary => {
            ToolResult::success(vec![binary_summary(tool, &response, output_dir).await])
        }
        ContentKind::Json => match serde_json::from_slice::<Value>(&response.payload) {
            Ok(value) => json_result(&value),
            Err(e) => {
                tracing::debug!(tool, error = %e, "response declared JSON but did not parse");
                text_result(response.text())
            }
        },
        ContentKind::Text => text_result(response.text()),
    }
}

/// Pretty JSON, or the no-data block for empty payloads.
pub fn json_result(value: &Value) -> ToolResult {
    if is_empty_json(value) {
        return ToolResult::no_data();
    }
    match serde_json::to_string_pretty(value) {
        Ok(text) => ToolResult::text(text),
        Err(_) => ToolResult::text(value.to_string()),
    }
}

fn text_result(text: String) -> ToolResult {
    if text.trim().is_empty() {
        ToolResult::no_data()
    } else {
        ToolResult::text(text)
    }
}

pub(crate) fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

async fn binary_summary(tool: &str, response: &EndpointResponse, output_dir: Option<&Path>) -> ContentBlock {
    let sha256 = format!("{:x}", Sha256::digest(&response.payload));
    let media_type = response
        .media_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let path = match output_dir {
        Some(dir) => {
            let file = dir.join(format!(
                "{}-{}.{}",
                tool,
                &sha256[..DIGEST_PREFIX_LEN],
                extension_for(&media_type)
            ));
            match write_payload(dir, &file, &response.payload).await {
                Ok(()) => Some(file.display().to_string()),
                Err(e) => {
                    tracing::warn!(tool, path = %file.display(), error = %e, "could not persist binary payload");
                    None
                }
            }
        }
        None => None,
    };

    ContentBlock::BinarySummary {
        byte_size: response.payload.len(),
        media_type,
        sha256,
        path,
    }
}

async fn write_payload(dir: &Path, file: &Path, payload: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(file, payload).await
}

fn extension_for(media_type: &str) -> &'static str {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    match essence.to_ascii_lowercase().as_str() {
        "image/tiff" | "image/geotiff" => "tif",
        "application/zip" | "application/x-zip-compressed" => "zip",
        "application/gzip" | "application/x-gzip" => "gz",
        "image/png" => "png",
        "application/netcdf" | "application/x-netcdf" => "nc",
        _ => "bin",
    }
}
