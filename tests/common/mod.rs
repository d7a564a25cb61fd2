//! Shared fixtures: an in-memory transport and a mockito-backed client.

#![allow(dead_code)]

use async_trait::async_trait;
use hcdp_mcp::protocol::EndpointRequest;
use hcdp_mcp::transport::{EndpointResponse, Transport, TransportError};
use hcdp_mcp::{Config, HcdpClient};
use mockito::{Server, ServerGuard};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "test-token";

/// Canned response per endpoint path; records every request it sees.
#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<&'static str, EndpointResponse>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<EndpointRequest>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, path: &'static str, status: u16, media_type: &str, body: impl Into<bytes::Bytes>) {
        self.routes
            .lock()
            .unwrap()
            .insert(path, EndpointResponse::new(status, Some(media_type.to_string()), body));
    }

    pub fn json(&self, path: &'static str, body: serde_json::Value) {
        self.route(path, 200, "application/json", body.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<EndpointRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<EndpointRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: &EndpointRequest) -> Result<EndpointResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        self.routes
            .lock()
            .unwrap()
            .get(request.path)
            .cloned()
            .ok_or_else(|| TransportError::Connection(format!("no route for {}", request.path)))
    }
}

pub fn stub_client(transport: Arc<StubTransport>) -> HcdpClient {
    stub_client_with(Config::default().with_token(TOKEN), transport)
}

pub fn stub_client_with(config: Config, transport: Arc<StubTransport>) -> HcdpClient {
    HcdpClient::builder()
        .config(config)
        .transport(transport)
        .build()
        .expect("client builds with a stub transport")
}

/// Client talking to a local mockito server over real HTTP.
pub async fn mock_server_client() -> (ServerGuard, HcdpClient) {
    let server = Server::new_async().await;
    let config = Config::default()
        .with_token(TOKEN)
        .with_base_url(&server.url())
        .expect("mockito url is valid");
    let client = HcdpClient::builder()
        .config(config)
        .build()
        .expect("client builds");
    (server, client)
}
