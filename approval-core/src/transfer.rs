//! Transfer aggregate (world state)
//!
//! A cached, read-optimized snapshot of a single funds-movement
//! transaction, shadowing the external ledger's authoritative record.
//! The cache must never claim a status more advanced than what the
//! ledger has confirmed; `reconcile_status` exists for exactly that.

use crate::machine::{self, Transition};
use crate::types::{
    AccountId, ApproverRecord, Decision, ParticipantId, Quorum, TransactionId, TransferStatus,
};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Cached world state for one transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    /// Internal record id
    pub id: Uuid,

    /// Globally unique transaction id
    pub transaction_id: TransactionId,

    /// Funds source
    pub from_account: AccountId,

    /// Funds destination
    pub to_account: AccountId,

    /// Transfer amount (must be positive)
    pub amount: Decimal,

    /// Current approval status
    pub status: TransferStatus,

    /// Required approver set, fixed at creation
    pub quorum: Quorum,

    /// One decision per participant (identity-keyed for dedup)
    pub decisions: BTreeMap<ParticipantId, Decision>,

    /// Decisions in acceptance order
    pub approvers: Vec<ApproverRecord>,

    /// Count of APPROVE decisions (always <= quorum size)
    pub approval_count: u32,

    /// Set on every mutation, monotonically non-decreasing
    pub last_updated: DateTime<Utc>,
}

impl WorldState {
    /// Create a new pending transfer
    ///
    /// Generates a transaction id when the caller did not supply one.
    /// Rejects non-positive amounts, empty approver sets, and
    /// self-transfers.
    pub fn create(
        transaction_id: Option<TransactionId>,
        from_account: AccountId,
        to_account: AccountId,
        amount: Decimal,
        required_approvers: BTreeSet<ParticipantId>,
    ) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidArgument(format!(
                "amount must be positive, got {}",
                amount
            )));
        }
        if from_account == to_account {
            return Err(Error::InvalidArgument(
                "from_account and to_account must differ".to_string(),
            ));
        }
        let quorum = Quorum::new(required_approvers)?;

        Ok(Self {
            id: Uuid::new_v4(),
            transaction_id: transaction_id.unwrap_or_else(TransactionId::generate),
            from_account,
            to_account,
            amount,
            status: TransferStatus::Pending,
            quorum,
            decisions: BTreeMap::new(),
            approvers: Vec::new(),
            approval_count: 0,
            last_updated: Utc::now(),
        })
    }

    /// Apply one incoming decision through the state machine
    ///
    /// On acceptance the decision is recorded (identity map and ordered
    /// list), the approval count recomputed, and the timestamp touched.
    /// Duplicates return `accepted = false` with no state change.
    pub fn record_decision(
        &mut self,
        participant: &ParticipantId,
        decision: Decision,
    ) -> Result<Transition> {
        let transition = machine::apply(
            self.status,
            &self.quorum,
            &self.decisions,
            participant,
            decision,
        )?;

        if transition.accepted {
            self.decisions.insert(participant.clone(), decision);
            self.approvers.push(ApproverRecord {
                participant_id: participant.clone(),
                decision,
                timestamp: Utc::now(),
            });
            self.status = transition.status;
            self.approval_count = self
                .decisions
                .values()
                .filter(|d| **d == Decision::Approve)
                .count() as u32;
            self.touch();
        }

        Ok(transition)
    }

    /// Adopt the ledger's authoritative status
    ///
    /// The gateway's returned status overwrites any locally computed one
    /// on disagreement; EXECUTED in particular is only ever adopted here.
    pub fn reconcile_status(&mut self, authoritative: TransferStatus) {
        if self.status != authoritative {
            tracing::debug!(
                transaction_id = %self.transaction_id,
                local = %self.status,
                ledger = %authoritative,
                "adopting ledger status over local"
            );
            self.status = authoritative;
            self.touch();
        }
    }

    /// Check whether this transfer accepts further decisions
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether a participant is a required approver
    pub fn requires_approval_from(&self, participant: &ParticipantId) -> bool {
        self.quorum.contains(participant)
    }

    fn touch(&mut self) {
        let now = Utc::now();
        if now > self.last_updated {
            self.last_updated = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approvers(ids: &[&str]) -> BTreeSet<ParticipantId> {
        ids.iter().map(|s| ParticipantId::new(*s)).collect()
    }

    fn transfer(ids: &[&str]) -> WorldState {
        WorldState::create(
            None,
            AccountId::new("ACC-A"),
            AccountId::new("ACC-B"),
            Decimal::from(100),
            approvers(ids),
        )
        .unwrap()
    }

    #[test]
    fn test_create_validations() {
        assert!(matches!(
            WorldState::create(
                None,
                AccountId::new("A"),
                AccountId::new("B"),
                Decimal::ZERO,
                approvers(&["x"]),
            ),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            WorldState::create(
                None,
                AccountId::new("A"),
                AccountId::new("A"),
                Decimal::from(10),
                approvers(&["x"]),
            ),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            WorldState::create(
                None,
                AccountId::new("A"),
                AccountId::new("B"),
                Decimal::from(10),
                BTreeSet::new(),
            ),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_generated_transaction_id_unique() {
        let a = transfer(&["x"]);
        let b = transfer(&["x"]);
        assert_ne!(a.transaction_id, b.transaction_id);
    }

    #[test]
    fn test_supplied_transaction_id_kept() {
        let ws = WorldState::create(
            Some(TransactionId::new("tx-42")),
            AccountId::new("A"),
            AccountId::new("B"),
            Decimal::from(10),
            approvers(&["x"]),
        )
        .unwrap();
        assert_eq!(ws.transaction_id.as_str(), "tx-42");
    }

    #[test]
    fn test_full_approval_scenario() {
        // create(from=A, to=B, amount=100, approvers=[X,Y])
        let mut ws = transfer(&["x", "y"]);
        assert_eq!(ws.status, TransferStatus::Pending);
        assert_eq!(ws.approval_count, 0);

        // approve as X
        let t = ws.record_decision(&ParticipantId::new("x"), Decision::Approve).unwrap();
        assert!(t.accepted);
        assert_eq!(ws.status, TransferStatus::PartiallyApproved);
        assert_eq!(ws.approval_count, 1);

        // approve as X again: duplicate, unchanged
        let t = ws.record_decision(&ParticipantId::new("x"), Decision::Approve).unwrap();
        assert!(!t.accepted);
        assert_eq!(ws.approval_count, 1);
        assert_eq!(ws.approvers.len(), 1);

        // approve as Y: quorum complete
        let t = ws.record_decision(&ParticipantId::new("y"), Decision::Approve).unwrap();
        assert!(t.accepted);
        assert_eq!(ws.status, TransferStatus::Approved);
        assert_eq!(ws.approval_count, 2);
    }

    #[test]
    fn test_approval_count_bounded_by_quorum() {
        let mut ws = transfer(&["x", "y", "z"]);
        for id in ["x", "y", "z", "x", "y"] {
            let _ = ws.record_decision(&ParticipantId::new(id), Decision::Approve);
        }
        assert!(ws.approval_count as usize <= ws.quorum.size());
        assert_eq!(ws.status, TransferStatus::Approved);
    }

    #[test]
    fn test_reject_is_terminal() {
        let mut ws = transfer(&["x", "y"]);
        ws.record_decision(&ParticipantId::new("x"), Decision::Reject).unwrap();
        assert_eq!(ws.status, TransferStatus::Rejected);

        let err = ws
            .record_decision(&ParticipantId::new("y"), Decision::Approve)
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn test_reconcile_adopts_ledger_status() {
        let mut ws = transfer(&["x"]);
        ws.record_decision(&ParticipantId::new("x"), Decision::Approve).unwrap();
        assert_eq!(ws.status, TransferStatus::Approved);

        // the ledger executed it outside this service
        ws.reconcile_status(TransferStatus::Executed);
        assert_eq!(ws.status, TransferStatus::Executed);
        assert!(ws.is_terminal());
    }

    #[test]
    fn test_last_updated_monotone() {
        let mut ws = transfer(&["x", "y"]);
        let t0 = ws.last_updated;
        ws.record_decision(&ParticipantId::new("x"), Decision::Approve).unwrap();
        assert!(ws.last_updated >= t0);
    }
}
