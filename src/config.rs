use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_CONTROL_PORT, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_READ_TIMEOUT_SECS, DEFAULT_TRANSFER_BUFFER_SIZE,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub default_port: u16,
    pub poll_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub transfer_buffer_size: Option<usize>, // Optional to allow default value
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_port: DEFAULT_CONTROL_PORT,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            transfer_buffer_size: Some(DEFAULT_TRANSFER_BUFFER_SIZE),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))?;

        // Set defaults if not specified
        if config.client.transfer_buffer_size.is_none() {
            config.client.transfer_buffer_size = Some(DEFAULT_TRANSFER_BUFFER_SIZE);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.client.default_port, 21);
        assert_eq!(config.client.poll_interval_ms, 100);
        assert_eq!(
            config.client.transfer_buffer_size,
            Some(DEFAULT_TRANSFER_BUFFER_SIZE)
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[client]\npoll_interval_ms = 25\n").unwrap();
        assert_eq!(config.client.poll_interval_ms, 25);
        assert_eq!(config.client.default_port, 21);
        assert_eq!(config.client.read_timeout_secs, DEFAULT_READ_TIMEOUT_SECS);
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.client.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
    }
}
