use crate::client::builder::HcdpClientBuilder;
use crate::client::composite;
use crate::client::error_translation::{translate, ToolError};
use crate::client::normalize::normalize;
use crate::config::Config;
use crate::error_code::ToolErrorKind;
use crate::protocol::{
    build_request, find_tool, list_tools, validate, validate_arguments, ToolDescriptor,
    ToolRequest, ToolTarget, ValidatedParameters,
};
use crate::transport::{ContentKind, EndpointResponse, Transport};
use crate::types::ToolResult;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// HCDP tool client: validator, request builder, transport and normalizer
/// wired together. Cheap to clone; shares only configuration and transport.
#[derive(Clone)]
pub struct HcdpClient {
    pub(crate) config: Arc<Config>,
    pub(crate) transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HcdpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HcdpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HcdpClient {
    pub fn builder() -> HcdpClientBuilder {
        HcdpClientBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The tool catalog. Needs no token.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        list_tools()
    }

    /// Invoke a tool. Never fails: every error is rendered as an error result.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> ToolResult {
        let request = ToolRequest::new(name, arguments);
        let started = Instant::now();
        let result = match self.try_call_tool(&request).await {
            Ok(result) => result,
            Err(err) => {
                warn!(tool = name, kind = err.kind.name(), message = %err.message, "tool call failed");
                err.into_tool_result()
            }
        };
        info!(
            tool = name,
            is_error = result.is_error,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "tool call finished"
        );
        result
    }

    /// Invoke a tool, surfacing local failures as [`ToolError`].
    ///
    /// Upstream HTTP errors still come back as `Ok` error results, since
    /// the normalizer owns their rendering.
    pub async fn try_call_tool(&self, request: &ToolRequest) -> Result<ToolResult, ToolError> {
        let params = validate(request)?;
        match params.tool.target {
            ToolTarget::Endpoint(_) => self.execute(&params).await,
            ToolTarget::Composite => composite::run(self, &params).await,
        }
    }

    /// Build, send and normalize one endpoint request.
    pub(crate) async fn execute(&self, params: &ValidatedParameters) -> Result<ToolResult, ToolError> {
        let response = self.send(params).await?;
        Ok(normalize(params.tool.name, response, self.config.output_dir.as_deref()).await)
    }

    async fn send(&self, params: &ValidatedParameters) -> Result<EndpointResponse, ToolError> {
        let request = build_request(params, &self.config)?;
        tracing::debug!(tool = params.tool.name, path = request.path, query = %request.query_string(), "sending HCDP request");
        self.transport
            .send(&request)
            .await
            .map_err(|e| ToolError::from(&e))
    }

    /// Call an endpoint-backed tool and decode its JSON body. Used by
    /// composite tools; non-2xx responses become [`ToolError`]s.
    pub(crate) async fn fetch_json(&self, tool: &str, arguments: Value) -> Result<Value, ToolError> {
        let spec = find_tool(tool).ok_or_else(|| {
            ToolError::new(ToolErrorKind::ConfigurationError, format!("unknown tool '{}'", tool))
        })?;
        let params = validate_arguments(spec, &arguments)?;
        let response = self.send(&params).await?;
        if !response.is_success() {
            return Err(translate(response.status, &response.payload));
        }
        match response.content_kind {
            ContentKind::Binary => Err(ToolError::new(
                ToolErrorKind::UpstreamError,
                format!("{} returned binary data where JSON was expected", tool),
            )),
            _ if response.payload.iter().all(u8::is_ascii_whitespace) => Ok(Value::Null),
            _ => serde_json::from_slice(&response.payload).map_err(|e| {
                ToolError::new(
                    ToolErrorKind::UpstreamError,
                    format!("{} returned malformed JSON: {}", tool, e),
                )
            }),
        }
    }
}
