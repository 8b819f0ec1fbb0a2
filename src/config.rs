//! Configuration management

use anyhow::{Context, Result};

use crate::defaults::DEFAULT_MAX_PAYLOAD_BYTES;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Roster submission endpoint (employee batch create). Optional so
    /// inspect/dry-run work offline; required at submission time.
    pub api_url: Option<String>,

    /// Cap on the serialized submission payload, in bytes
    pub max_payload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let api_url = std::env::var("ROSTER_API_URL").ok();

        let max_payload_bytes = match std::env::var("MAX_PAYLOAD_BYTES") {
            Ok(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("MAX_PAYLOAD_BYTES must be a byte count, got '{}'", raw))?,
            Err(_) => DEFAULT_MAX_PAYLOAD_BYTES,
        };

        if max_payload_bytes == 0 {
            anyhow::bail!("MAX_PAYLOAD_BYTES must be greater than zero");
        }

        Ok(Self {
            api_url,
            max_payload_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // requires --test-threads=1 due to env var race
    fn test_config_payload_cap_defaults_to_one_mib() {
        std::env::remove_var("MAX_PAYLOAD_BYTES");

        let config = Config::from_env().unwrap();
        assert_eq!(config.max_payload_bytes, DEFAULT_MAX_PAYLOAD_BYTES);
    }

    #[test]
    #[ignore] // requires --test-threads=1 due to env var race
    fn test_config_payload_cap_from_env() {
        std::env::set_var("MAX_PAYLOAD_BYTES", "2048");

        let config = Config::from_env().unwrap();
        assert_eq!(config.max_payload_bytes, 2048);

        // Cleanup
        std::env::remove_var("MAX_PAYLOAD_BYTES");
    }
}
