//! Studio configuration

pub const DEFAULT_PORT: u16 = 8090;
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Studio server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address (env: HOST)
    pub host: String,
    /// HTTP port (env: PORT)
    pub port: u16,
    /// Environment: development | staging | production (env: IVGK_ENV)
    pub environment: String,
    /// Largest accepted request body (env: MAX_BODY_BYTES)
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            environment: "development".into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            environment: lookup("IVGK_ENV")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.environment),
            max_body_bytes: lookup("MAX_BODY_BYTES")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
