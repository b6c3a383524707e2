//! Core types for multi-party approval
//!
//! All types are designed for:
//! - Deterministic serialization (BTree collections, stable wire strings)
//! - Exact arithmetic (Decimal for money)
//! - Set-based duplicate detection (approver identity, not timestamps)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Participant identifier (anchor, supplier, or bank)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create new participant ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Globally unique transfer transaction identifier
///
/// Caller-supplied or generated at create time, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create from an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh unique identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contract identifier (generated once, immutable)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(String);

impl ContractId {
    /// Create from an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh unique identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account identifier (funds source or destination)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Participant role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Buyer initiating contracts and transfers
    Anchor,
    /// Supplier owed a payment obligation
    Supplier,
    /// Bank granting approvals
    Bank,
}

impl Role {
    /// Stable wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anchor => "ANCHOR",
            Role::Supplier => "SUPPLIER",
            Role::Bank => "BANK",
        }
    }

    /// Parse from wire string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ANCHOR" => Some(Role::Anchor),
            "SUPPLIER" => Some(Role::Supplier),
            "BANK" => Some(Role::Bank),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Participant identity (immutable once registered)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identity
    pub id: ParticipantId,

    /// Human-readable display name
    pub display_name: String,

    /// Role in the approval network
    pub role: Role,
}

/// Transfer lifecycle status
///
/// Pending is initial; Executed and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    /// No approvals recorded yet
    Pending,
    /// Some but not all required approvers have approved
    PartiallyApproved,
    /// Full quorum reached
    Approved,
    /// Executed by the ledger (terminal)
    Executed,
    /// Rejected by a required approver (terminal)
    Rejected,
}

impl TransferStatus {
    /// Stable wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "PENDING",
            TransferStatus::PartiallyApproved => "PARTIALLY_APPROVED",
            TransferStatus::Approved => "APPROVED",
            TransferStatus::Executed => "EXECUTED",
            TransferStatus::Rejected => "REJECTED",
        }
    }

    /// Parse from wire string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(TransferStatus::Pending),
            "PARTIALLY_APPROVED" => Some(TransferStatus::PartiallyApproved),
            "APPROVED" => Some(TransferStatus::Approved),
            "EXECUTED" => Some(TransferStatus::Executed),
            "REJECTED" => Some(TransferStatus::Rejected),
            _ => None,
        }
    }

    /// Check if no further transition is accepted
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Executed | TransferStatus::Rejected)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decision submitted by a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Grant approval toward the quorum
    Approve,
    /// Reject the transfer outright
    Reject,
    /// Mark executed (ledger-confirmed only)
    Execute,
}

/// A decision recorded once per participant, in acceptance order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproverRecord {
    /// Who decided
    pub participant_id: ParticipantId,

    /// What they decided
    pub decision: Decision,

    /// When the decision was accepted
    pub timestamp: DateTime<Utc>,
}

/// The fixed set of required approvers for a transfer
///
/// Fixed at creation; approval is necessary and sufficient for
/// APPROVED status exactly when every member has approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quorum {
    required: BTreeSet<ParticipantId>,
}

impl Quorum {
    /// Build from a set of required approvers
    pub fn new(required: BTreeSet<ParticipantId>) -> crate::Result<Self> {
        if required.is_empty() {
            return Err(crate::Error::InvalidArgument(
                "required approver set cannot be empty".to_string(),
            ));
        }
        Ok(Self { required })
    }

    /// Check membership
    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.required.contains(participant)
    }

    /// Number of required approvers
    pub fn size(&self) -> usize {
        self.required.len()
    }

    /// Iterate over required approvers
    pub fn members(&self) -> impl Iterator<Item = &ParticipantId> {
        self.required.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_status_wire_strings() {
        assert_eq!(TransferStatus::PartiallyApproved.as_str(), "PARTIALLY_APPROVED");
        assert_eq!(
            TransferStatus::parse("PARTIALLY_APPROVED"),
            Some(TransferStatus::PartiallyApproved)
        );
        assert_eq!(TransferStatus::parse("UNKNOWN"), None);
    }

    #[test]
    fn test_status_terminality() {
        assert!(!TransferStatus::Pending.is_terminal());
        assert!(!TransferStatus::Approved.is_terminal());
        assert!(TransferStatus::Executed.is_terminal());
        assert!(TransferStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_quorum_rejects_empty() {
        assert!(Quorum::new(BTreeSet::new()).is_err());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("SUPPLIER"), Some(Role::Supplier));
        assert_eq!(Role::parse("supplier"), None);
    }

    #[test]
    fn test_status_serde_matches_wire() {
        let json = serde_json::to_string(&TransferStatus::PartiallyApproved).unwrap();
        assert_eq!(json, "\"PARTIALLY_APPROVED\"");
    }
}
