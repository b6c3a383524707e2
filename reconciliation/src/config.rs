//! Configuration for the reconciliation service
//!
//! Process-wide configuration built once at startup and injected into
//! the service; read-only thereafter.

use ledger_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};

/// Reconciliation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Ledger gateway settings
    pub gateway: GatewayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "reconciliation".to_string(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl Config {
    /// Load from TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(url) = std::env::var("LEDGER_GATEWAY_URL") {
            config.gateway.base_url = url;
        }

        if let Ok(timeout) = std::env::var("LEDGER_GATEWAY_TIMEOUT_MS") {
            config.gateway.request_timeout_ms = timeout
                .parse()
                .map_err(|_| crate::Error::Config("invalid LEDGER_GATEWAY_TIMEOUT_MS".to_string()))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "reconciliation");
        assert_eq!(config.gateway.base_url, "http://localhost:8081");
    }

    #[test]
    fn test_from_toml() {
        let config: Config = toml::from_str(
            r#"
            service_name = "recon-test"

            [gateway]
            base_url = "http://ledger:9000"
            request_timeout_ms = 1000
            connect_timeout_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.service_name, "recon-test");
        assert_eq!(config.gateway.base_url, "http://ledger:9000");
        assert_eq!(config.gateway.request_timeout_ms, 1000);
    }
}
