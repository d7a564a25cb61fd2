use crate::client::core::HcdpClient;
use crate::config::Config;
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for [`HcdpClient`].
///
/// Without an explicit [`Config`] the builder reads the environment
/// (`HCDP_*`); without an explicit transport it creates an [`HttpTransport`].
#[derive(Default)]
pub struct HcdpClientBuilder {
    config: Option<Config>,
    token: Option<String>,
    base_url: Option<String>,
    output_dir: Option<PathBuf>,
    transport: Option<Arc<dyn Transport>>,
}

impl HcdpClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this configuration instead of reading the environment.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the base URL (primarily for testing with mock servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Inject a transport (stubs in tests, custom HTTP stacks).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<HcdpClient> {
        let mut config = match self.config {
            Some(config) => config,
            None => Config::from_env()?,
        };
        if let Some(token) = self.token {
            config = config.with_token(token);
        }
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(&base_url)?;
        }
        if let Some(dir) = self.output_dir {
            config = config.with_output_dir(dir);
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&config)?),
        };

        tracing::debug!(base_url = %config.base_url, has_token = config.api_token.is_some(), "HCDP client ready");

        Ok(HcdpClient {
            config: Arc::new(config),
            transport,
        })
    }
}
