//! TradeGate Ledger Gateway
//!
//! The boundary component through which the approval core delegates
//! canonical transaction creation, approval, and status queries to the
//! external ledger authority. Treated as an unreliable remote
//! dependency: every failure collapses to a single retry-safe
//! `Unavailable` error kind.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod types;

// Re-exports
pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use gateway::LedgerGateway;
pub use http::HttpLedgerGateway;
pub use types::{
    Ack, ApproveWire, ContractApprovalWire, ContractWire, CreateTransferWire, SupplierWire,
    WorldStateWire,
};
