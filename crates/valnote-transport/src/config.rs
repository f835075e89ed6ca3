//! Client connection settings

use std::time::Duration;

use serde::Deserialize;

/// Default server port
pub const DEFAULT_PORT: u16 = 8001;

/// Settings for [`Client::connect`](crate::Client::connect)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server hostname or address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Timeout applied to connect, send and receive; none waits forever
    pub timeout_secs: Option<u64>,
    /// Password sent right after connecting
    pub password: Option<String>,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// `host:port`, for display
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            timeout_secs: None,
            password: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.address(), "127.0.0.1:8001");
        assert_eq!(config.timeout(), None);
        assert!(config.password.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("example.com", 9000)
            .with_password("securepassword")
            .with_timeout_secs(5);

        assert_eq!(config.address(), "example.com:9000");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.password.as_deref(), Some("securepassword"));
    }
}
