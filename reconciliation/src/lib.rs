//! TradeGate Reconciliation Service
//!
//! Orchestrates multi-party approval against the external ledger
//! authority:
//!
//! 1. **Validate**: reject malformed requests before any side effect
//! 2. **Round-trip**: delegate the canonical operation to the ledger
//! 3. **Apply**: run the approval state machine on the cached aggregate
//! 4. **Persist**: write the cache only after ledger success
//!
//! The cached world state is a read-optimized shadow of the ledger's
//! authoritative record and must never claim a status more advanced than
//! what the ledger confirmed.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod error;
pub mod locks;
pub mod metrics;
pub mod service;
pub mod store;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use locks::EntityLocks;
pub use metrics::Metrics;
pub use service::{
    ContractApproval, CreateContractRequest, CreateTransferRequest, ReconciliationService,
    TransferApproval, TransferSummary,
};
pub use store::{CacheStore, InMemoryStore};
