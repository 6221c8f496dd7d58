//! Client configuration.

/// Default base URL for the public Navitia API.
pub const DEFAULT_BASE_URL: &str = "https://api.navitia.io/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default ceiling on the number of bytes read from any reply body (10 MiB).
///
/// GeoJSON-enabled replies can exceed a megabyte, so this leaves headroom.
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Configuration for a Navitia [`Session`](super::Session).
///
/// Established once when the session is built and never mutated afterwards;
/// separate sessions may use different configurations in one process.
#[derive(Debug, Clone)]
pub struct NavitiaConfig {
    /// API key, sent as the basic-auth username with an empty password
    pub api_key: String,
    /// Base URL for the API (defaults to the public Navitia instance)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of bytes read from a reply body
    pub max_body_size: usize,
}

impl NavitiaConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Set a custom base URL (for testing, or a self-hosted instance).
    ///
    /// A trailing slash is dropped so endpoint paths can be appended.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the reply body size ceiling.
    pub fn with_max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Check the configuration before building a session.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_body_size == 0 {
            return Err("max_body_size must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = NavitiaConfig::new("test-key")
            .with_base_url("http://localhost:8080/")
            .with_timeout(60)
            .with_max_body_size(1024);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_body_size, 1024);
    }

    #[test]
    fn config_defaults() {
        let config = NavitiaConfig::new("test-key");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_failures() {
        assert!(NavitiaConfig::new("k").with_base_url("").validate().is_err());
        assert!(NavitiaConfig::new("k").with_timeout(0).validate().is_err());
        assert!(
            NavitiaConfig::new("k")
                .with_max_body_size(0)
                .validate()
                .is_err()
        );
    }
}
