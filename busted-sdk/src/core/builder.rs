//! Client builder implementation
//!
//! Assembles an `HttpClient` from a `ClientConfig`, building the `reqwest`
//! transport unless a custom one is supplied.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as ReqwestClient;

use super::{HttpClient, HttpTransport, ReqwestTransport};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Builder for `HttpClient`
pub struct ClientBuilder {
    /// Settings frozen into the built client
    config: ClientConfig,

    /// Enable response decompression
    compression: bool,

    /// Transport override, used by tests and embedders
    transport: Option<Arc<dyn HttpTransport>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            config: ClientConfig::default(),
            compression: true,
            transport: None,
        }
    }
}

impl ClientBuilder {
    /// Create a new client builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the base URL for the service
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the bearer token; empty tokens disable the Authorization header
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config = self.config.with_api_key(key);
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable compression
    pub fn compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    /// Use a custom transport instead of `reqwest`
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build a `reqwest` client with the configured settings
    pub fn build_http_client(&self) -> Result<ReqwestClient> {
        ReqwestClient::builder()
            .timeout(self.config.timeout)
            .user_agent(self.config.user_agent.as_str())
            .gzip(self.compression)
            .build()
            .map_err(|e| ClientError::configuration(format!("Failed to build HTTP client: {}", e)))
    }

    /// Build the `HttpClient`
    pub fn build(self) -> Result<HttpClient> {
        self.config.validate()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(ref transport) => Arc::clone(transport),
            None => Arc::new(ReqwestTransport::new(self.build_http_client()?)),
        };

        HttpClient::new(self.config, transport)
    }
}
