//! Client configuration

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Preferred variable for the backend base URL
pub const API_BASE_URL_VAR: &str = "IVGK_API_BASE_URL";
/// Accepted for compatibility with existing dashboard deployments
pub const LEGACY_API_BASE_URL_VAR: &str = "NEXT_PUBLIC_API_BASE_URL";
pub const ENV_VAR: &str = "IVGK_ENV";

/// Client configuration for the IVGK REST backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL including the `/api` prefix
    pub api_base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Sent as `User-Agent`
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            timeout: 30,
            user_agent: concat!("ivgk-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Read the base URL from the environment
    ///
    /// `IVGK_API_BASE_URL` wins over `NEXT_PUBLIC_API_BASE_URL`. When neither
    /// is set the local default is used, with a warning in production.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let configured = [API_BASE_URL_VAR, LEGACY_API_BASE_URL_VAR]
            .into_iter()
            .filter_map(&lookup)
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty());

        match configured {
            Some(url) => Self::new(url),
            None => {
                if lookup(ENV_VAR).as_deref() == Some("production") {
                    tracing::warn!(
                        fallback = DEFAULT_API_BASE_URL,
                        "{API_BASE_URL_VAR} is not set. Configure it for deployed environments."
                    );
                }
                Self::default()
            }
        }
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_local_backend() {
        let config = ClientConfig::from_lookup(lookup(&[("IVGK_ENV", "production")]));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn preferred_variable_wins() {
        let config = ClientConfig::from_lookup(lookup(&[
            (LEGACY_API_BASE_URL_VAR, "https://legacy.test/api"),
            (API_BASE_URL_VAR, "https://api.test/api/"),
        ]));
        assert_eq!(config.base_url(), "https://api.test/api");
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_BASE_URL_VAR, "  "),
            (LEGACY_API_BASE_URL_VAR, "https://legacy.test/api"),
        ]));
        assert_eq!(config.api_base_url, "https://legacy.test/api");
    }

    #[test]
    fn builders_override_fields() {
        let config = ClientConfig::new("http://x").with_timeout(5).with_user_agent("t");
        assert_eq!(config.timeout_duration(), Duration::from_secs(5));
        assert_eq!(config.user_agent, "t");
    }
}
