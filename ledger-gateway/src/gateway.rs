//! Ledger gateway interface
//!
//! The boundary to the external ledger authority. All calls are
//! synchronous request/response over a network boundary and may fail;
//! callers treat any failure uniformly as unavailable and never mutate
//! local state on the failure path.

use crate::types::*;
use crate::Result;
use async_trait::async_trait;

/// External ledger authority contract
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Submit the canonical create for a transfer
    async fn submit_create(&self, request: &CreateTransferWire) -> Result<WorldStateWire>;

    /// Submit one participant's approval
    async fn submit_approve(&self, request: &ApproveWire) -> Result<WorldStateWire>;

    /// Query the authoritative status of a transfer
    async fn query_status(&self, transaction_id: &str) -> Result<WorldStateWire>;

    /// List transfers awaiting a participant's approval
    async fn query_pending(&self, approver_id: &str) -> Result<Vec<WorldStateWire>>;

    /// Submit the canonical create for a contract
    async fn submit_contract(&self, request: &ContractWire) -> Result<Ack>;

    /// Submit a supplier's contract approval
    async fn approve_contract(&self, request: &ContractApprovalWire) -> Result<Ack>;

    /// Gateway name (for logs)
    fn name(&self) -> &str;
}
