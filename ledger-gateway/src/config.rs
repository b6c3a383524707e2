//! Gateway configuration

use serde::{Deserialize, Serialize};

/// Configuration for the HTTP ledger gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the ledger authority
    pub base_url: String,

    /// Per-request timeout (milliseconds); a timeout is reported as
    /// unavailable, never as success or permanent failure
    pub request_timeout_ms: u64,

    /// Connect timeout (milliseconds)
    pub connect_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            request_timeout_ms: 5_000,
            connect_timeout_ms: 2_000,
        }
    }
}
