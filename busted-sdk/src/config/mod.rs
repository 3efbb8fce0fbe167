//! Configuration management for the similarity client
//!
//! Configuration is read once, at process start, through a `ConfigProvider`
//! and frozen into an immutable `ClientConfig` that is handed to the HTTP
//! client. Nothing on the request path reads the environment.

use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use url::Url;

use crate::error::{ClientError, Result};

/// Base URL used when none is configured (local development backend)
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable prefix for all client settings
pub const ENV_PREFIX: &str = "GIT_BUSTED";

/// Configuration keys understood by `ClientConfig::from_provider`
pub mod keys {
    pub const API_URL: &str = "api_url";
    pub const API_KEY: &str = "api_key";
    pub const TIMEOUT_SECONDS: &str = "timeout_seconds";
}

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Get an integer configuration value
    fn get_int(&self, key: &str) -> Result<i64> {
        let value = self.get_string(key)?;
        value.trim().parse::<i64>().map_err(|e| {
            ClientError::configuration(format!("Invalid integer for key {}: {}", key, e))
        })
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get an integer configuration value with a default
    fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    /// Get an optional string value; missing keys are `None`
    fn get_optional(&self, key: &str) -> Option<String> {
        self.get_string(key).ok()
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,
}

impl EnvConfigProvider {
    /// Create a new environment variable config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Format a configuration key as an environment variable
    pub(crate) fn format_key(&self, key: &str) -> String {
        let mut env_key = String::new();

        if let Some(ref prefix) = self.prefix {
            env_key.push_str(prefix);
            env_key.push('_');
        }

        env_key.push_str(&key.to_uppercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_"));

        env_key
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key).map_err(|e| match e {
            env::VarError::NotPresent => {
                ClientError::configuration(format!("Environment variable not set: {}", env_key))
            }
            env::VarError::NotUnicode(_) => ClientError::configuration(format!(
                "Environment variable is not valid unicode: {}",
                env_key
            )),
        })
    }
}

/// In-memory config provider for command-line overrides and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ClientError::configuration(format!("Configuration key not found: {}", key)))
    }
}

/// A composite config provider that tries multiple providers in order
#[derive(Default)]
pub struct CompositeConfigProvider {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl CompositeConfigProvider {
    /// Create a new composite config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider to the end of the chain
    pub fn add_provider(&mut self, provider: impl ConfigProvider + 'static) {
        self.providers.push(Box::new(provider));
    }

    /// Builder form of `add_provider`
    pub fn with_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.add_provider(provider);
        self
    }
}

impl ConfigProvider for CompositeConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.providers
            .iter()
            .find_map(|provider| provider.get_string(key).ok())
            .ok_or_else(|| {
                ClientError::configuration(format!(
                    "Configuration key not found in any provider: {}",
                    key
                ))
            })
    }
}

/// Global default configuration provider
pub static DEFAULT_PROVIDER: Lazy<Arc<EnvConfigProvider>> =
    Lazy::new(|| Arc::new(EnvConfigProvider::new().with_prefix(ENV_PREFIX)));

/// Immutable settings of an `HttpClient`
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every request path is joined onto
    pub base_url: String,

    /// Bearer token; `None` means no Authorization header is sent
    pub api_key: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("git-busted/{}", env!("CARGO_PKG_VERSION"))
}

fn normalize_api_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

impl ClientConfig {
    /// Create a configuration for a base URL with default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the API key; empty keys are treated as absent
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = normalize_api_key(Some(api_key.into()));
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Load configuration from a config provider
    ///
    /// Missing keys fall back to defaults; present but malformed values are
    /// configuration errors.
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let base_url = provider.get_string_or(keys::API_URL, DEFAULT_BASE_URL);
        let api_key = normalize_api_key(provider.get_optional(keys::API_KEY));

        let timeout_seconds = match provider.get_optional(keys::TIMEOUT_SECONDS) {
            Some(_) => provider.get_int(keys::TIMEOUT_SECONDS)?,
            None => DEFAULT_TIMEOUT_SECS as i64,
        };
        if timeout_seconds <= 0 {
            return Err(ClientError::configuration(format!(
                "Timeout must be a positive number of seconds, got {}",
                timeout_seconds
            )));
        }

        let config = Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(timeout_seconds as u64),
            user_agent: default_user_agent(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the process environment (`GIT_BUSTED_*`)
    pub fn from_env() -> Result<Self> {
        Self::from_provider(&**DEFAULT_PROVIDER)
    }

    /// Validate this configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ClientError::configuration("Base URL is required"));
        }

        let parsed = Url::parse(base_url).map_err(|e| {
            ClientError::configuration(format!("Invalid base URL {}: {}", base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::configuration(format!(
                "Base URL must use http or https, got {}",
                parsed.scheme()
            )));
        }

        if self.timeout.is_zero() {
            return Err(ClientError::configuration("Timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Whether an Authorization header will be sent
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_format() {
        let provider = EnvConfigProvider::new().with_prefix("GIT_BUSTED");

        assert_eq!(provider.format_key("api_key"), "GIT_BUSTED_API_KEY");
        assert_eq!(provider.format_key("api-url"), "GIT_BUSTED_API_URL");
    }

    #[test]
    fn test_defaults_from_empty_provider() {
        let config = ClientConfig::from_provider(&MemoryConfigProvider::new()).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_blank_api_key_means_none() {
        let config = ClientConfig::default().with_api_key("   ");
        assert!(!config.has_api_key());

        let config = ClientConfig::default().with_api_key("secret");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }
}
