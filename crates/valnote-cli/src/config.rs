//! Config file loading
//!
//! ```toml
//! [server]
//! host = "db.example.com"
//! port = 8001
//! timeout_secs = 5
//! password = "securepassword"
//!
//! [output]
//! json = false
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use valnote_transport::ClientConfig;

/// Contents of a config file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: ClientConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print results as JSON instead of notation
    pub json: bool,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let config = FileConfig::parse(
            r#"
            [server]
            host = "db.example.com"
            port = 9001
            timeout_secs = 5
            password = "securepassword"

            [output]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server.address(), "db.example.com:9001");
        assert_eq!(config.server.timeout_secs, Some(5));
        assert_eq!(config.server.password.as_deref(), Some("securepassword"));
        assert!(config.output.json);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = FileConfig::parse("[server]\nport = 7000\n").unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7000);
        assert!(config.server.password.is_none());
        assert!(!config.output.json);

        let empty = FileConfig::parse("").unwrap();
        assert_eq!(empty.server, ClientConfig::default());
    }

    #[test]
    fn test_rejects_wrong_types() {
        assert!(FileConfig::parse("[server]\nport = \"high\"\n").is_err());
    }
}
