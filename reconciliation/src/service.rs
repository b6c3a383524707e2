//! Reconciliation service
//!
//! Orchestrates every inbound operation: validate request → ledger
//! gateway round-trip → approval state machine → persist cached world
//! state → return result.
//!
//! All local persistence is gated on a successful gateway round-trip, so
//! the cache and the ledger never diverge into an inconsistent state: on
//! any gateway failure the operation aborts with `LedgerUnavailable` and
//! performs no partial local mutation. The gateway's returned status is
//! authoritative and overwrites local computation on disagreement.

use crate::config::Config;
use crate::locks::EntityLocks;
use crate::metrics::Metrics;
use crate::store::CacheStore;
use crate::{Error, Result};
use approval_core::{
    AccountId, Contract, ContractId, Decision, Directory, NewLine, Participant, ParticipantId,
    Role, TransactionId, TransferStatus, WorldState,
};
use chrono::{DateTime, Utc};
use ledger_gateway::{
    ApproveWire, ContractApprovalWire, ContractWire, CreateTransferWire, LedgerGateway,
    SupplierWire, WorldStateWire,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Request to create a transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransferRequest {
    /// Caller-supplied transaction id; generated when absent
    pub transaction_id: Option<TransactionId>,

    /// Funds source
    pub from_account: AccountId,

    /// Funds destination
    pub to_account: AccountId,

    /// Transfer amount
    pub amount: Decimal,

    /// Required approver set
    pub required_approvers: BTreeSet<ParticipantId>,
}

/// Request to create a contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContractRequest {
    /// Buyer (anchor)
    pub buyer: ParticipantId,

    /// Supplier lines
    pub lines: Vec<NewLine>,

    /// Free-form description
    pub description: Option<String>,

    /// Optional attached document reference
    pub file_ref: Option<String>,
}

/// Result of a transfer approval submission
#[derive(Debug, Clone)]
pub struct TransferApproval {
    /// Cached state after the submission
    pub state: WorldState,

    /// True when the submission was a deduplicated repeat
    pub duplicate: bool,
}

/// Result of a contract approval submission
#[derive(Debug, Clone)]
pub struct ContractApproval {
    /// Cached contract after the submission
    pub contract: Contract,

    /// True when the supplier had already approved
    pub duplicate: bool,
}

/// Read-side summary of a transfer as the ledger reports it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferSummary {
    /// Transaction id
    pub transaction_id: TransactionId,

    /// Funds source
    pub from_account: AccountId,

    /// Funds destination
    pub to_account: AccountId,

    /// Transfer amount
    pub amount: Decimal,

    /// Raw ledger status string (filterable by exact membership)
    pub status: String,

    /// Approvals the ledger has recorded
    pub approval_count: u32,

    /// Ledger-side last update time
    pub last_updated: Option<DateTime<Utc>>,
}

/// The approval reconciliation service
pub struct ReconciliationService {
    gateway: Arc<dyn LedgerGateway>,
    store: Arc<dyn CacheStore>,
    directory: Arc<dyn Directory>,
    locks: EntityLocks,
    metrics: Metrics,
    config: Config,
}

impl ReconciliationService {
    /// Create the service with its collaborators injected at startup
    pub fn new(
        config: Config,
        gateway: Arc<dyn LedgerGateway>,
        store: Arc<dyn CacheStore>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            gateway,
            store,
            directory,
            locks: EntityLocks::new(),
            metrics: Metrics::default(),
            config,
        }
    }

    /// Metrics registry for scraping
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    // ---- transfers ----

    /// Create a transfer: canonical create on the ledger, then cache
    ///
    /// Validation failures raise before any remote call. On gateway
    /// failure no local record is written, so retrying the identical
    /// request (same transaction id) succeeds exactly once.
    pub async fn create_transfer(&self, request: CreateTransferRequest) -> Result<WorldState> {
        for approver in &request.required_approvers {
            if self.directory.get(approver).is_none() {
                return Err(Error::InvalidArgument(format!(
                    "unknown approver {}",
                    approver
                )));
            }
        }

        let mut state = WorldState::create(
            request.transaction_id,
            request.from_account,
            request.to_account,
            request.amount,
            request.required_approvers,
        )?;

        let _guard = self.locks.acquire(state.transaction_id.as_str()).await;

        if self.store.get_world_state(&state.transaction_id)?.is_some() {
            return Err(Error::Conflict(format!(
                "transaction {} already exists",
                state.transaction_id
            )));
        }

        let wire = CreateTransferWire {
            transaction_id: state.transaction_id.as_str().to_string(),
            from_account: state.from_account.as_str().to_string(),
            to_account: state.to_account.as_str().to_string(),
            amount: state.amount,
            approvers: state.quorum.members().map(|p| p.as_str().to_string()).collect(),
        };

        let response = self.gateway_call(self.gateway.submit_create(&wire)).await?;
        state.reconcile_status(parse_wire_status(&response)?);

        self.store.put_world_state(&state)?;
        self.metrics.transfers_created.inc();
        info!(
            transaction_id = %state.transaction_id,
            amount = %state.amount,
            quorum = state.quorum.size(),
            "transfer created"
        );

        Ok(state)
    }

    /// Submit one participant's approval for a transfer
    ///
    /// Duplicates are detected locally by approver identity and returned
    /// as the current state without a ledger round-trip; a fresh approval
    /// round-trips the ledger first and mutates the cache only on
    /// success.
    pub async fn approve_transfer(
        &self,
        transaction_id: &TransactionId,
        approver_id: &ParticipantId,
    ) -> Result<TransferApproval> {
        let _guard = self.locks.acquire(transaction_id.as_str()).await;

        let mut state = self
            .store
            .get_world_state(transaction_id)?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", transaction_id)))?;

        if !state.requires_approval_from(approver_id) {
            return Err(Error::InvalidArgument(format!(
                "{} is not a required approver for {}",
                approver_id, transaction_id
            )));
        }

        if state.decisions.contains_key(approver_id) {
            self.metrics.duplicate_approvals.inc();
            info!(
                %transaction_id,
                approver = %approver_id,
                "duplicate approval deduplicated"
            );
            return Ok(TransferApproval {
                state,
                duplicate: true,
            });
        }

        if state.is_terminal() {
            return Err(Error::Conflict(format!(
                "transaction {} is terminal in status {}",
                transaction_id, state.status
            )));
        }

        let wire = ApproveWire {
            transaction_id: transaction_id.as_str().to_string(),
            approver_id: approver_id.as_str().to_string(),
        };
        let response = self.gateway_call(self.gateway.submit_approve(&wire)).await?;

        state.record_decision(approver_id, Decision::Approve)?;
        // the ledger's view wins over what we just computed
        state.reconcile_status(parse_wire_status(&response)?);

        self.store.put_world_state(&state)?;
        self.metrics.approvals.inc();
        info!(
            %transaction_id,
            approver = %approver_id,
            status = %state.status,
            approval_count = state.approval_count,
            "approval recorded"
        );

        Ok(TransferApproval {
            state,
            duplicate: false,
        })
    }

    /// Authoritative status of a transfer
    ///
    /// Always re-fetches from the ledger rather than trusting the cache,
    /// because the ledger can progress state (e.g. execute) outside this
    /// service's direct calls.
    pub async fn get_transfer_status(&self, transaction_id: &TransactionId) -> Result<WorldState> {
        let mut state = self
            .store
            .get_world_state(transaction_id)?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", transaction_id)))?;

        let response = self
            .gateway_call(self.gateway.query_status(transaction_id.as_str()))
            .await?;
        state.reconcile_status(parse_wire_status(&response)?);

        self.store.put_world_state(&state)?;
        Ok(state)
    }

    /// Transfers awaiting a participant's approval
    ///
    /// `status_filter` is a comma-separated list matched by exact string
    /// membership against the ledger's status strings; absent means all.
    pub async fn list_pending(
        &self,
        approver_id: &ParticipantId,
        status_filter: Option<&str>,
    ) -> Result<Vec<TransferSummary>> {
        let pending = self
            .gateway_call(self.gateway.query_pending(approver_id.as_str()))
            .await?;

        let accepted = parse_status_filter(status_filter);
        let summaries = pending
            .into_iter()
            .filter(|ws| match &accepted {
                Some(set) => set.contains(ws.status.as_str()),
                None => true,
            })
            .map(summary_from_wire)
            .collect();

        Ok(summaries)
    }

    /// List transfers for an approver, optionally filtered by status
    ///
    /// An absent approver yields an empty list.
    pub async fn list_transfers(
        &self,
        approver_id: Option<&ParticipantId>,
        status_filter: Option<&str>,
    ) -> Result<Vec<TransferSummary>> {
        match approver_id {
            Some(approver) => self.list_pending(approver, status_filter).await,
            None => Ok(Vec::new()),
        }
    }

    // ---- contracts ----

    /// Create a contract: canonical create on the ledger, then cache
    pub async fn create_contract(&self, request: CreateContractRequest) -> Result<Contract> {
        if self.directory.get(&request.buyer).is_none() {
            return Err(Error::InvalidArgument(format!(
                "unknown buyer {}",
                request.buyer
            )));
        }
        for line in &request.lines {
            if self.directory.get(&line.supplier_id).is_none() {
                return Err(Error::InvalidArgument(format!(
                    "unknown supplier {}",
                    line.supplier_id
                )));
            }
        }

        let contract = Contract::create(
            request.buyer,
            request.lines,
            request.description,
            request.file_ref,
        )?;

        let _guard = self.locks.acquire(contract.contract_id.as_str()).await;

        let wire = ContractWire {
            contract_id: contract.contract_id.as_str().to_string(),
            buyer: contract.buyer.as_str().to_string(),
            description: contract.description.clone(),
            suppliers: contract
                .lines
                .iter()
                .map(|l| SupplierWire {
                    supplier_id: l.supplier_id.as_str().to_string(),
                    amount: l.amount,
                })
                .collect(),
            total_amount: contract.total_amount,
            file_url: contract.file_ref.clone(),
        };

        let ack = self.gateway_call(self.gateway.submit_contract(&wire)).await?;
        if !ack.is_success() {
            self.metrics.ledger_errors.inc();
            return Err(Error::LedgerUnavailable(format!(
                "ledger rejected contract create: {}",
                ack.status
            )));
        }

        self.store.put_contract(&contract)?;
        info!(
            contract_id = %contract.contract_id,
            total = %contract.total_amount,
            lines = contract.lines.len(),
            "contract created"
        );

        Ok(contract)
    }

    /// Approve one supplier's line on a contract
    pub async fn approve_contract(
        &self,
        contract_id: &ContractId,
        supplier_id: &ParticipantId,
    ) -> Result<ContractApproval> {
        let _guard = self.locks.acquire(contract_id.as_str()).await;

        let mut contract = self
            .store
            .get_contract(contract_id)?
            .ok_or_else(|| Error::NotFound(format!("contract {}", contract_id)))?;

        let line = contract
            .lines
            .iter()
            .find(|l| &l.supplier_id == supplier_id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "supplier {} not on contract {}",
                    supplier_id, contract_id
                ))
            })?;

        if line.status == approval_core::LineStatus::Approved {
            info!(
                %contract_id,
                supplier = %supplier_id,
                "duplicate contract approval deduplicated"
            );
            return Ok(ContractApproval {
                contract,
                duplicate: true,
            });
        }

        let wire = ContractApprovalWire {
            contract_id: contract_id.as_str().to_string(),
            supplier_id: supplier_id.as_str().to_string(),
        };
        let ack = self.gateway_call(self.gateway.approve_contract(&wire)).await?;
        if !ack.is_success() {
            self.metrics.ledger_errors.inc();
            return Err(Error::LedgerUnavailable(format!(
                "ledger rejected contract approval: {}",
                ack.status
            )));
        }

        contract.approve_line(supplier_id)?;
        self.store.put_contract(&contract)?;
        self.metrics.approvals.inc();
        info!(
            %contract_id,
            supplier = %supplier_id,
            status = contract.status.as_str(),
            "contract approval recorded"
        );

        Ok(ContractApproval {
            contract,
            duplicate: false,
        })
    }

    /// Fetch one contract, supplier names enriched from the directory
    pub async fn get_contract(&self, contract_id: &ContractId) -> Result<Contract> {
        let contract = self
            .store
            .get_contract(contract_id)?
            .ok_or_else(|| Error::NotFound(format!("contract {}", contract_id)))?;
        Ok(contract.enriched(self.directory.as_ref()))
    }

    /// All cached contracts, enriched
    pub async fn list_contracts(&self) -> Result<Vec<Contract>> {
        let contracts = self.store.list_contracts()?;
        Ok(contracts
            .into_iter()
            .map(|c| c.enriched(self.directory.as_ref()))
            .collect())
    }

    /// Contracts where the participant is buyer or supplier, enriched
    pub async fn contracts_for_user(&self, participant: &ParticipantId) -> Result<Vec<Contract>> {
        let contracts = self.store.contracts_for_user(participant)?;
        Ok(contracts
            .into_iter()
            .map(|c| c.enriched(self.directory.as_ref()))
            .collect())
    }

    // ---- participants ----

    /// Look up one participant
    pub fn get_user(&self, id: &ParticipantId) -> Result<Participant> {
        self.directory
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("participant {}", id)))
    }

    /// All registered participants
    pub fn list_users(&self) -> Vec<Participant> {
        self.directory.list()
    }

    /// All registered suppliers
    pub fn list_suppliers(&self) -> Vec<Participant> {
        self.directory.list_by_role(Role::Supplier)
    }

    // ---- internals ----

    /// Run one gateway round-trip with latency and error accounting
    ///
    /// Bounded by the configured request timeout even if the gateway
    /// implementation never resolves; a timeout is retry-safe because
    /// approvals dedupe by participant identity.
    async fn gateway_call<T>(
        &self,
        call: impl std::future::Future<Output = ledger_gateway::Result<T>>,
    ) -> Result<T> {
        let deadline = Duration::from_millis(
            self.config.gateway.connect_timeout_ms + self.config.gateway.request_timeout_ms,
        );

        let timer = self.metrics.gateway_duration.start_timer();
        let result = tokio::time::timeout(deadline, call).await;
        timer.observe_duration();

        let result = match result {
            Ok(inner) => inner,
            Err(_) => Err(ledger_gateway::Error::Unavailable(format!(
                "ledger round-trip exceeded {}ms",
                deadline.as_millis()
            ))),
        };

        result.map_err(|e| {
            self.metrics.ledger_errors.inc();
            warn!(gateway = self.gateway.name(), error = %e, "ledger round-trip failed");
            Error::from(e)
        })
    }
}

/// Parse the ledger's authoritative status string
///
/// An unknown status string means the response cannot be trusted, which
/// is treated like any other unusable ledger reply.
fn parse_wire_status(wire: &WorldStateWire) -> Result<TransferStatus> {
    TransferStatus::parse(&wire.status).ok_or_else(|| {
        Error::LedgerUnavailable(format!("ledger returned unknown status {:?}", wire.status))
    })
}

/// Parse a comma-separated status filter into an exact-match set
fn parse_status_filter(filter: Option<&str>) -> Option<HashSet<String>> {
    filter.map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

fn summary_from_wire(wire: WorldStateWire) -> TransferSummary {
    TransferSummary {
        transaction_id: TransactionId::new(wire.transaction_id),
        from_account: AccountId::new(wire.from_account),
        to_account: AccountId::new(wire.to_account),
        amount: wire.amount,
        status: wire.status,
        approval_count: wire.approval_count,
        last_updated: wire.last_updated,
    }
}
