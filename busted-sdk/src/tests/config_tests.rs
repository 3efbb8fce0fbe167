//! Tests for configuration management functionality
//!
//! These tests verify that the configuration providers and `ClientConfig`
//! loading work correctly.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env;
    use std::time::Duration;

    use crate::config::{
        keys, ClientConfig, CompositeConfigProvider, ConfigProvider, ConfigProviderExt,
        EnvConfigProvider, MemoryConfigProvider, DEFAULT_BASE_URL,
    };
    use crate::error::ClientError;

    #[test]
    fn test_memory_config_provider() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("api_url", "http://detector:8000");
        provider.set("timeout_seconds", "12");

        assert_eq!(provider.get_string("api_url").unwrap(), "http://detector:8000");
        assert_eq!(provider.get_int("timeout_seconds").unwrap(), 12);
        assert_eq!(provider.get_string_or("missing", "default"), "default");
        assert_eq!(provider.get_int_or("missing", 60), 60);
        assert!(provider.get_string("missing").is_err());
        assert!(provider.get_int("api_url").is_err());
    }

    #[test]
    fn test_config_from_initial_values() {
        let mut values = HashMap::new();
        values.insert(keys::API_URL.to_string(), "https://detector.example.com".to_string());
        values.insert(keys::API_KEY.to_string(), "   ".to_string());
        let provider = MemoryConfigProvider::with_values(values);

        let config = ClientConfig::from_provider(&provider).unwrap();
        assert_eq!(config.base_url, "https://detector.example.com");
        assert!(!config.has_api_key());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_builder_methods() {
        let config = ClientConfig::new("http://detector:8000")
            .with_timeout(Duration::from_secs(3))
            .with_user_agent("busted-tests/1.0");

        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "busted-tests/1.0");
        assert!(config.validate().is_ok());
        assert!(config.with_timeout(Duration::ZERO).validate().is_err());
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("BUSTED_TEST_ENV_API_URL", "http://env-host:9000");
        env::set_var("BUSTED_TEST_ENV_API_KEY", "env-key");
        env::set_var("BUSTED_TEST_ENV_TIMEOUT_SECONDS", "7");

        let provider = EnvConfigProvider::new().with_prefix("BUSTED_TEST_ENV");
        let config = ClientConfig::from_provider(&provider).unwrap();

        assert_eq!(config.base_url, "http://env-host:9000");
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.timeout, Duration::from_secs(7));

        env::remove_var("BUSTED_TEST_ENV_API_URL");
        env::remove_var("BUSTED_TEST_ENV_API_KEY");
        env::remove_var("BUSTED_TEST_ENV_TIMEOUT_SECONDS");
    }

    #[test]
    fn test_unset_env_uses_defaults() {
        let provider = EnvConfigProvider::new().with_prefix("BUSTED_TEST_UNSET");
        let config = ClientConfig::from_provider(&provider).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_composite_prefers_earlier_providers() {
        let mut flags = MemoryConfigProvider::new();
        flags.set(keys::API_URL, "http://flag-host:1");

        let mut file = MemoryConfigProvider::new();
        file.set(keys::API_URL, "http://file-host:2");
        file.set(keys::API_KEY, "file-key");

        let provider = CompositeConfigProvider::new()
            .with_provider(flags)
            .with_provider(file);

        let config = ClientConfig::from_provider(&provider).unwrap();
        assert_eq!(config.base_url, "http://flag-host:1");
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
        assert!(provider.get_string("nothing").is_err());
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let mut provider = MemoryConfigProvider::new();
        provider.set(keys::TIMEOUT_SECONDS, "soon");
        assert!(matches!(
            ClientConfig::from_provider(&provider),
            Err(ClientError::Configuration(_))
        ));

        let mut provider = MemoryConfigProvider::new();
        provider.set(keys::TIMEOUT_SECONDS, "0");
        assert!(ClientConfig::from_provider(&provider).is_err());

        let mut provider = MemoryConfigProvider::new();
        provider.set(keys::API_URL, "ftp://files.example.com");
        assert!(ClientConfig::from_provider(&provider).is_err());

        let mut provider = MemoryConfigProvider::new();
        provider.set(keys::API_URL, "");
        assert!(ClientConfig::from_provider(&provider).is_err());
    }
}
