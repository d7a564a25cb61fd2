use super::{EndpointResponse, Transport, TransportError};
use crate::config::Config;
use crate::protocol::{EndpointRequest, HttpMethod};
use crate::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Proxy;
use std::time::{Duration, Instant};

/// reqwest-backed transport against the HCDP API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: Config,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .user_agent(concat!("hcdp-mcp/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy_url) = &config.proxy_url {
            match Proxy::all(proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => tracing::warn!(error = %e, "ignoring invalid HCDP_PROXY_URL"),
            }
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Connection(e.to_string())))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn classify(&self, e: reqwest::Error, timeout: Duration) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(timeout)
        } else {
            TransportError::Connection(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &EndpointRequest) -> std::result::Result<EndpointResponse, TransportError> {
        let url = format!("{}{}", self.base_url(), request.path);
        let timeout = self.config.timeout_for(request.class);

        let mut req = match request.method {
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Get => self.client.get(&url),
        };
        req = req
            .query(&request.query)
            .bearer_auth(request.token.expose())
            .timeout(timeout);
        if let Some(body) = &request.body {
            req = req.header(CONTENT_TYPE, "application/json").body(body.clone());
        }

        let started = Instant::now();
        let response = req.send().await.map_err(|e| self.classify(e, timeout))?;
        let status = response.status().as_u16();
        tracing::debug!(
            method = %request.method,
            path = request.path,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "HCDP response headers received"
        );

        if !(200..600).contains(&status) || (300..400).contains(&status) {
            return Err(TransportError::UnexpectedStatus(status));
        }

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let payload = response.bytes().await.map_err(|e| self.classify(e, timeout))?;

        Ok(EndpointResponse::new(status, media_type, payload))
    }
}
