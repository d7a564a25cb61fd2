//! Process-wide configuration, read once at startup and passed explicitly.

use crate::protocol::EndpointClass;
use crate::{Error, ErrorContext, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://ikeauth.its.hawaii.edu/files/v2/download/public";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BULK_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 8;

/// Immutable adapter configuration.
#[derive(Clone, PartialEq)]
pub struct Config {
    /// Bearer token; may be absent until the first endpoint call.
    pub api_token: Option<String>,
    /// Base URL without trailing slash.
    pub base_url: String,
    pub timeout: Duration,
    pub bulk_timeout: Duration,
    /// Where binary payloads are persisted, if anywhere.
    pub output_dir: Option<PathBuf>,
    pub proxy_url: Option<String>,
    /// Idle keep-alive connections kept per host.
    pub pool_max_idle_per_host: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("bulk_timeout", &self.bulk_timeout)
            .field("output_dir", &self.output_dir)
            .field("proxy_url", &self.proxy_url)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bulk_timeout: Duration::from_secs(DEFAULT_BULK_TIMEOUT_SECS),
            output_dir: None,
            proxy_url: None,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
        }
    }
}

impl Config {
    /// Read `HCDP_*` environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `HCDP_API_TOKEN` | none |
    /// | `HCDP_BASE_URL` | [`DEFAULT_BASE_URL`] |
    /// | `HCDP_TIMEOUT_SECS` | 30 |
    /// | `HCDP_BULK_TIMEOUT_SECS` | 120 |
    /// | `HCDP_OUTPUT_DIR` | none |
    /// | `HCDP_PROXY_URL` | none |
    /// | `HCDP_HTTP_POOL_MAX_IDLE_PER_HOST` | 8 |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let secs = |key: &str, default: u64| -> Result<Duration> {
            match get(key) {
                None => Ok(Duration::from_secs(default)),
                Some(raw) => raw
                    .parse::<u64>()
                    .ok()
                    .filter(|n| *n > 0)
                    .map(Duration::from_secs)
                    .ok_or_else(|| {
                        Error::configuration_with_context(
                            "timeout must be a positive number of seconds",
                            ErrorContext::new()
                                .with_field_path(key)
                                .with_details(format!("got '{}'", raw))
                                .with_source("config"),
                        )
                    }),
            }
        };

        let pool_max_idle_per_host = match get("HCDP_HTTP_POOL_MAX_IDLE_PER_HOST") {
            None => DEFAULT_POOL_MAX_IDLE_PER_HOST,
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                Error::configuration_with_context(
                    "pool size must be a non-negative integer",
                    ErrorContext::new()
                        .with_field_path("HCDP_HTTP_POOL_MAX_IDLE_PER_HOST")
                        .with_details(format!("got '{}'", raw))
                        .with_source("config"),
                )
            })?,
        };

        let base_url = match get("HCDP_BASE_URL") {
            Some(raw) => validate_base_url(&raw)?,
            None => DEFAULT_BASE_URL.to_string(),
        };

        Ok(Self {
            api_token: get("HCDP_API_TOKEN"),
            base_url,
            timeout: secs("HCDP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            bulk_timeout: secs("HCDP_BULK_TIMEOUT_SECS", DEFAULT_BULK_TIMEOUT_SECS)?,
            output_dir: get("HCDP_OUTPUT_DIR").map(PathBuf::from),
            proxy_url: get("HCDP_PROXY_URL"),
            pool_max_idle_per_host,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = validate_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn timeout_for(&self, class: EndpointClass) -> Duration {
        match class {
            EndpointClass::Metadata => self.timeout,
            EndpointClass::Bulk => self.bulk_timeout,
        }
    }
}

fn validate_base_url(raw: &str) -> Result<String> {
    let parsed = url::Url::parse(raw).map_err(|e| {
        Error::configuration_with_context(
            "invalid base URL",
            ErrorContext::new()
                .with_field_path("HCDP_BASE_URL")
                .with_details(e.to_string())
                .with_source("config"),
        )
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::configuration_with_context(
            "base URL must use http or https",
            ErrorContext::new()
                .with_field_path("HCDP_BASE_URL")
                .with_details(format!("scheme '{}'", parsed.scheme()))
                .with_source("config"),
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.timeout_for(EndpointClass::Bulk), Duration::from_secs(120));
    }

    #[test]
    fn test_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("HCDP_API_TOKEN", " abc "),
            ("HCDP_BASE_URL", "http://localhost:8080/api/"),
            ("HCDP_TIMEOUT_SECS", "5"),
            ("HCDP_OUTPUT_DIR", "/tmp/hcdp"),
            ("HCDP_HTTP_POOL_MAX_IDLE_PER_HOST", "0"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_token.as_deref(), Some("abc"));
        assert_eq!(cfg.base_url, "http://localhost:8080/api");
        assert_eq!(cfg.timeout_for(EndpointClass::Metadata), Duration::from_secs(5));
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/hcdp")));
        assert_eq!(cfg.pool_max_idle_per_host, 0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_lookup(lookup(&[("HCDP_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("HCDP_TIMEOUT_SECS"));
        assert!(Config::from_lookup(lookup(&[("HCDP_BASE_URL", "not a url")])).is_err());
        assert!(Config::from_lookup(lookup(&[("HCDP_BASE_URL", "ftp://host/x")])).is_err());
        let err = Config::from_lookup(lookup(&[("HCDP_HTTP_POOL_MAX_IDLE_PER_HOST", "-1")])).unwrap_err();
        assert!(err.to_string().contains("HCDP_HTTP_POOL_MAX_IDLE_PER_HOST"));
    }

    #[test]
    fn test_debug_hides_token() {
        let cfg = Config::default().with_token("very-secret");
        assert!(!format!("{:?}", cfg).contains("very-secret"));
    }
}
