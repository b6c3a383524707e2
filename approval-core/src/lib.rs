//! TradeGate Approval Core
//!
//! Domain logic for multi-party approval of financial transfers and
//! supply-chain contracts: a transaction becomes final only after a
//! quorum of designated approvers confirms it.
//!
//! # Invariants
//!
//! - One decision per participant: duplicates are idempotent no-ops
//! - `approval_count` never exceeds the quorum size
//! - Status is monotone; EXECUTED and REJECTED are terminal
//! - A contract is APPROVED iff every supplier line is approved
//! - The cache never claims a status ahead of the ledger's

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod contract;
pub mod directory;
pub mod error;
pub mod machine;
pub mod transfer;
pub mod types;

// Re-exports
pub use contract::{Contract, ContractStatus, LineStatus, NewLine, SupplierLine};
pub use directory::{Directory, InMemoryDirectory};
pub use error::{Error, Result};
pub use machine::Transition;
pub use transfer::WorldState;
pub use types::{
    AccountId, ApproverRecord, ContractId, Decision, Participant, ParticipantId, Quorum, Role,
    TransactionId, TransferStatus,
};
