//! Newline-delimited JSON-RPC server over any async reader/writer pair.
//!
//! Each `tools/call` runs on its own task; every response goes through one
//! writer task so concurrent calls never interleave output lines.

use super::{McpToolInvocation, McpToolResult, Request, Response, PROTOCOL_VERSION, SERVER_NAME};
use crate::client::HcdpClient;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("parse error: {0}")]
    Parse(serde_json::Error),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("unknown method: {0}")]
    InvalidMethod(String),
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),
}

/// MCP server exposing the HCDP tools.
#[derive(Debug, Clone)]
pub struct McpServer {
    client: HcdpClient,
}

enum Dispatch {
    Reply(Response),
    Spawned,
    Silent,
}

impl McpServer {
    pub fn new(client: HcdpClient) -> Self {
        Self { client }
    }

    /// Serve the process's stdin/stdout until stdin closes.
    pub async fn serve_stdio(self) -> Result<(), ServerError> {
        let reader = tokio::io::BufReader::new(tokio::io::stdin());
        self.serve(reader, tokio::io::stdout()).await
    }

    /// Serve until `reader` reaches EOF, then wait for in-flight calls.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<Response>();
        let writer_task = tokio::spawn(write_loop(rx, writer));
        let mut calls = JoinSet::new();

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match self.dispatch(trimmed, &tx, &mut calls) {
                Dispatch::Reply(response) => {
                    if tx.send(response).is_err() {
                        break;
                    }
                }
                Dispatch::Spawned | Dispatch::Silent => {}
            }
        }

        while calls.join_next().await.is_some() {}
        drop(tx);
        match writer_task.await {
            Ok(result) => result,
            Err(e) => Err(ServerError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))),
        }
    }

    fn dispatch(
        &self,
        line: &str,
        tx: &mpsc::UnboundedSender<Response>,
        calls: &mut JoinSet<()>,
    ) -> Dispatch {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable message");
                return Dispatch::Reply(Response::error(None, ServerError::Parse(e)));
            }
        };
        let raw_id = value.get("id").cloned();
        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Dispatch::Reply(Response::error(raw_id, ServerError::InvalidRequest(e.to_string())))
            }
        };

        if raw_id.is_none() || request.method.starts_with("notifications/") {
            tracing::debug!(method = %request.method, "notification");
            return Dispatch::Silent;
        }

        let id = request.id;
        match request.method.as_str() {
            "initialize" => {
                let requested = request
                    .params
                    .as_ref()
                    .and_then(|p| p.get("protocolVersion"))
                    .and_then(Value::as_str)
                    .unwrap_or(PROTOCOL_VERSION)
                    .to_string();
                tracing::info!(protocol_version = %requested, "initialize");
                Dispatch::Reply(Response::success(
                    id,
                    json!({
                        "protocolVersion": requested,
                        "capabilities": {"tools": {"listChanged": false}},
                        "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
                    }),
                ))
            }
            "ping" => Dispatch::Reply(Response::success(id, json!({}))),
            "tools/list" => match serde_json::to_value(self.client.list_tools()) {
                Ok(tools) => Dispatch::Reply(Response::success(id, json!({ "tools": tools }))),
                Err(e) => Dispatch::Reply(Response::error(id, ServerError::Serialization(e))),
            },
            "tools/call" => {
                let invocation: McpToolInvocation = match request.params.map(serde_json::from_value) {
                    Some(Ok(invocation)) => invocation,
                    Some(Err(e)) => {
                        return Dispatch::Reply(Response::error(
                            id,
                            ServerError::InvalidParams(format!("tools/call: {}", e)),
                        ))
                    }
                    None => {
                        return Dispatch::Reply(Response::error(
                            id,
                            ServerError::InvalidParams("tools/call: missing parameters".into()),
                        ))
                    }
                };
                let client = self.client.clone();
                let tx = tx.clone();
                calls.spawn(async move {
                    let result = client.call_tool(&invocation.name, invocation.arguments).await;
                    let response = match serde_json::to_value(McpToolResult::from(result)) {
                        Ok(value) => Response::success(id, value),
                        Err(e) => Response::error(id, ServerError::Serialization(e)),
                    };
                    let _ = tx.send(response);
                });
                Dispatch::Spawned
            }
            other => Dispatch::Reply(Response::error(id, ServerError::InvalidMethod(other.to_string()))),
        }
    }
}

async fn write_loop<W>(mut rx: mpsc::UnboundedReceiver<Response>, writer: W) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    let mut writer = BufWriter::new(writer);
    while let Some(response) = rx.recv().await {
        let payload = serde_json::to_string(&response).map_err(ServerError::Serialization)?;
        writer.write_all(payload.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}
