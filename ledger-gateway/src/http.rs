//! HTTP implementation of the ledger gateway
//!
//! Talks JSON to the ledger authority's REST surface:
//!
//! - `POST /tx/create`
//! - `POST /tx/approve`
//! - `GET  /tx/status/{transaction_id}`
//! - `GET  /tx/pending-approvals?user_id={approver_id}`
//! - `POST /contract/create`
//! - `POST /contract/approve`
//!
//! Timeouts are bounded at the client level; the gateway initiates no
//! retries of its own (retry policy is a caller concern).

use crate::config::GatewayConfig;
use crate::gateway::LedgerGateway;
use crate::types::*;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// HTTP JSON client for the ledger authority
#[derive(Debug)]
pub struct HttpLedgerGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLedgerGateway {
    /// Build a gateway from configuration
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "ledger gateway POST");

        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(path, response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "ledger gateway GET");

        let response = self.client.get(&url).send().await?;
        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%path, %status, "ledger returned non-success");
            return Err(Error::Unavailable(format!(
                "ledger returned {} for {}",
                status, path
            )));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::warn!(%path, error = %e, "undecodable ledger response");
            Error::Unavailable(format!("undecodable ledger response for {}: {}", path, e))
        })
    }
}

#[async_trait]
impl LedgerGateway for HttpLedgerGateway {
    async fn submit_create(&self, request: &CreateTransferWire) -> Result<WorldStateWire> {
        self.post_json("/tx/create", request).await
    }

    async fn submit_approve(&self, request: &ApproveWire) -> Result<WorldStateWire> {
        self.post_json("/tx/approve", request).await
    }

    async fn query_status(&self, transaction_id: &str) -> Result<WorldStateWire> {
        self.get_json(&format!("/tx/status/{}", transaction_id)).await
    }

    async fn query_pending(&self, approver_id: &str) -> Result<Vec<WorldStateWire>> {
        self.get_json(&format!("/tx/pending-approvals?user_id={}", approver_id))
            .await
    }

    async fn submit_contract(&self, request: &ContractWire) -> Result<Ack> {
        self.post_json("/contract/create", request).await
    }

    async fn approve_contract(&self, request: &ContractApprovalWire) -> Result<Ack> {
        self.post_json("/contract/approve", request).await
    }

    fn name(&self) -> &str {
        "http-ledger-gateway"
    }
}
