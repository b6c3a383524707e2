//! Cached world-state store
//!
//! The persistence boundary: a simple key-lookup/query interface over
//! the external document store. Records are addressed by unique id;
//! the reconciliation service exclusively owns write access.

use approval_core::{Contract, ContractId, ParticipantId, TransactionId, WorldState};
use crate::Result;
use dashmap::DashMap;

/// Key-lookup/query interface over the cached aggregates
pub trait CacheStore: Send + Sync {
    /// Upsert a transfer's cached world state
    fn put_world_state(&self, state: &WorldState) -> Result<()>;

    /// Exact-match lookup by transaction id
    fn get_world_state(&self, transaction_id: &TransactionId) -> Result<Option<WorldState>>;

    /// Transfers whose quorum includes the participant
    fn world_states_for_approver(&self, participant: &ParticipantId) -> Result<Vec<WorldState>>;

    /// Upsert a cached contract
    fn put_contract(&self, contract: &Contract) -> Result<()>;

    /// Exact-match lookup by contract id
    fn get_contract(&self, contract_id: &ContractId) -> Result<Option<Contract>>;

    /// All cached contracts
    fn list_contracts(&self) -> Result<Vec<Contract>>;

    /// Contracts where the participant is buyer or a supplier line
    fn contracts_for_user(&self, participant: &ParticipantId) -> Result<Vec<Contract>>;
}

/// In-memory cache store backed by concurrent maps
#[derive(Debug, Default)]
pub struct InMemoryStore {
    world_states: DashMap<TransactionId, WorldState>,
    contracts: DashMap<ContractId, Contract>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for InMemoryStore {
    fn put_world_state(&self, state: &WorldState) -> Result<()> {
        self.world_states
            .insert(state.transaction_id.clone(), state.clone());
        Ok(())
    }

    fn get_world_state(&self, transaction_id: &TransactionId) -> Result<Option<WorldState>> {
        Ok(self.world_states.get(transaction_id).map(|e| e.clone()))
    }

    fn world_states_for_approver(&self, participant: &ParticipantId) -> Result<Vec<WorldState>> {
        let mut matching: Vec<WorldState> = self
            .world_states
            .iter()
            .filter(|e| e.quorum.contains(participant))
            .map(|e| e.clone())
            .collect();
        matching.sort_by(|a, b| a.transaction_id.cmp(&b.transaction_id));
        Ok(matching)
    }

    fn put_contract(&self, contract: &Contract) -> Result<()> {
        self.contracts
            .insert(contract.contract_id.clone(), contract.clone());
        Ok(())
    }

    fn get_contract(&self, contract_id: &ContractId) -> Result<Option<Contract>> {
        Ok(self.contracts.get(contract_id).map(|e| e.clone()))
    }

    fn list_contracts(&self) -> Result<Vec<Contract>> {
        let mut all: Vec<Contract> = self.contracts.iter().map(|e| e.clone()).collect();
        all.sort_by(|a, b| a.contract_id.cmp(&b.contract_id));
        Ok(all)
    }

    fn contracts_for_user(&self, participant: &ParticipantId) -> Result<Vec<Contract>> {
        let mut matching: Vec<Contract> = self
            .contracts
            .iter()
            .filter(|e| e.involves(participant))
            .map(|e| e.clone())
            .collect();
        matching.sort_by(|a, b| a.contract_id.cmp(&b.contract_id));
        Ok(matching)
    }
}
